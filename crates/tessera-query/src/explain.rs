/// Describe a query outcome for the caller.
///
/// `applied` holds one item per predicate that took part, in evaluation order.
pub fn explain(applied: &[String], total_matching: usize, returned: usize) -> String {
    if applied.is_empty() {
        return format!("Returning {returned} of {total_matching} total records (no filters applied).");
    }
    let plural = if total_matching == 1 { "" } else { "s" };
    format!(
        "Matched {total_matching} record{plural} with filters: {}. Returning {returned}.",
        applied.join(", ")
    )
}
