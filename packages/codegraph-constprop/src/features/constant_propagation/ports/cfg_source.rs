use crate::features::constant_propagation::infrastructure::errors::AnalysisResult;
use crate::shared::models::ControlFlowGraph;

/// Builds the CFG of a function body on demand
pub trait CfgSource {
    fn build_cfg(&self, function_id: &str) -> AnalysisResult<ControlFlowGraph>;
}

impl<F> CfgSource for F
where
    F: Fn(&str) -> AnalysisResult<ControlFlowGraph>,
{
    fn build_cfg(&self, function_id: &str) -> AnalysisResult<ControlFlowGraph> {
        self(function_id)
    }
}
