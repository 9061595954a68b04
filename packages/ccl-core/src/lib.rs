pub mod border;
pub mod cag;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod labeler;
pub mod logger;
pub mod merge;
pub mod partition;
pub mod reader;
pub mod relabel;
pub mod transport;
pub mod wire;

pub use engine::{EngineResult, run};
pub use error::EngineError;
pub use graph::{Label, LocalSubgraph, VertexId};
