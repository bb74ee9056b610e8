//! Logging macros taking a `Code` plus `"key" => value` context pairs
//!
//! Context values only need `Display`; the current quest context (if any) is
//! attached by the support functions in `logging`.

/// Log an error event and record it against the current quest
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_error_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $crate::logging::log_error_with_context($code, $message, context_refs)
    }};
}

/// Log a success event with an `I0xx` code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_success_with_context($code, $message, vec![])
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $crate::logging::log_success_with_context($code, $message, context_refs)
    }};
}

#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_info_with_context($message, vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $crate::logging::log_info_with_context($message, context_refs)
    }};
}

/// Log a warning; warnings are also collected for the batch report
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        $crate::logging::log_warning_with_context(None, $message, vec![])
    };

    (code = $code:expr, $message:expr) => {
        $crate::logging::log_warning_with_context(Some($code), $message, vec![])
    };

    (code = $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $crate::logging::log_warning_with_context(Some($code), $message, context_refs)
    }};

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {{
        let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
        let context_refs: Vec<(&str, &str)> = context_strings
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .collect();
        $crate::logging::log_warning_with_context(None, $message, context_refs)
    }};
}

#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            $crate::logging::log_debug_with_context($message, vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::config::get_min_log_level() >= $crate::logging::LogLevel::Debug {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            let context_refs: Vec<(&str, &str)> = context_strings
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .collect();
            $crate::logging::log_debug_with_context($message, context_refs)
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_accept_display_values() {
        let steps: usize = 12;
        let url = "https://example.invalid/ImpCatcher.java";

        log_error!(codes::fetch::HTTP_STATUS, "Source fetch failed",
            "status" => 404,
            "url" => url
        );
        log_success!(codes::success::EXTRACTION_COMPLETE, "Extraction complete",
            "steps" => steps,
        );
        log_info!("Fetching source", "url" => url);
        log_warning!("Panel list not recognised", "panel" => "Starting off");
        log_warning!(code = codes::extraction::DANGLING_STEP_REFERENCE, "Dangling step",
            "step" => "talkToWizard"
        );
        log_debug!("Located member", "member" => "getPanels", "offset" => 120);
    }
}
