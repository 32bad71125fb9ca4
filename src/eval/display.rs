use super::state::EvalResults;
use crate::frame::{Field, FieldValues, Frame};

impl EvalResults {
    /// Project the results into a single-row frame for display
    ///
    /// One bool field per instance, labeled with the instance labels and
    /// holding whether the instance is alerting. Display only; the states
    /// themselves remain authoritative.
    pub fn as_display_frame(&self) -> Frame {
        let fields = self
            .iter()
            .map(|result| {
                Field::new(
                    "",
                    result.instance.clone(),
                    FieldValues::Bool(vec![result.state.is_alerting()]),
                )
            })
            .collect();

        Frame {
            name: String::new(),
            fields,
        }
    }
}
