//! Panel groupings from `getPanels`

use crate::lexical::calls::constructor_calls;
use crate::lexical::lists::parse_list_expression;
use crate::lexical::literal::read_string_argument;
use crate::record::PanelGrouping;

/// Every `new PanelDetails("<title>", <list>, ...)`, in source order.
///
/// A grouping whose second argument is not an inline list literal is kept
/// with no step references. Calls without a readable title are skipped.
pub fn extract_panels(body: &str) -> Vec<PanelGrouping> {
    constructor_calls(body, "PanelDetails")
        .iter()
        .filter_map(|call| {
            let args = call.arguments();
            let title = read_string_argument(args.first()?)?;

            let step_references = match args.get(1) {
                Some(list) => parse_list_expression(list).unwrap_or_else(|| {
                    crate::log_debug!("Panel step list not recognised",
                        "panel" => &title,
                        "expression" => list
                    );
                    Vec::new()
                }),
                None => Vec::new(),
            };

            Some(PanelGrouping {
                title,
                step_references,
            })
        })
        .collect()
}
