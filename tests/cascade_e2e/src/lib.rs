// Cascading-deletion verification harness
// Checks that the store's garbage collector removes controlled dependents
// once their owner is deleted with foreground propagation.


pub use config::{ScenarioConfig, ScenarioKind, StoreBackend, TestConfig};
pub use eventual::{EventualAssertion, PollOutcome};
pub use scenarios::{
    CascadeScenario, NoCascadeScenario, ScenarioError, ScenarioReport, Step,
};
