//! Constant propagation infrastructure

pub mod block_pass;
pub mod constant_folder;
pub mod dump;
pub mod errors;
pub mod graph_walker;
pub mod in_memory_source;
pub mod loop_classifier;
pub mod mutation_tracker;
pub mod value_history;
pub mod value_kinds;

pub use block_pass::BlockDataflowPass;
pub use constant_folder::ConstantFolder;
pub use dump::HistoryDump;
pub use errors::{AnalysisResult, PropagationError};
pub use graph_walker::{FunctionAnalysis, GraphWalker};
pub use in_memory_source::InMemoryCfgSource;
pub use loop_classifier::LoopClassifier;
pub use mutation_tracker::MutationTracker;
pub use value_history::ValueHistory;
pub use value_kinds::{IntegerKind, StringKind};
