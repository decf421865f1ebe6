//! # rfpilot agent
//!
//! The agent drives the antenna design dialogue:
//! 1. User describes the antenna they need
//! 2. Model refines the design across chat turns
//! 3. A reply carrying the completion marker is saved verbatim and run
//!    as the simulation script
//! 4. The script's S11 sweep is summarized into one feedback sentence
//! 5. The feedback becomes the next user turn, and the loop continues
//!
//! The model designs, the simulator measures.

mod agent;

pub use agent::{design_complete, AgentConfig, DesignAgent, COMPLETION_MARKER};
