//! Domain models.
//!
//! Input data for the five problem domains, the constraint descriptor
//! shared by every model builder, and the solution records builders
//! produce.
//!
//! # Domain Mappings
//!
//! | u-milp | Routing | Evacuation | Missions | Staffing | Production |
//! |--------|---------|------------|----------|----------|------------|
//! | Node | Router | Zone / corridor / exit | | | |
//! | Edge | Link | Passage | | | |
//! | Entity | | | Mission | Candidate | Product |
//! | Capacity | Bandwidth | Throughput | Resource units | Shift demand | Resource availability |
//! | Record | `EdgeFlow` | `EdgeFlow` | `MissionSchedule` | `ShiftRoster` | quantities |

mod calendar;
mod constraint;
mod mission;
mod network;
mod production;
mod schedule;
mod staffing;

pub use calendar::{DemandEntry, Shift, ShiftKind, StaffingCalendar, StaffingDemand};
pub use constraint::{ConstraintCategory, ConstraintTag};
pub use mission::{Mission, MissionResource};
pub use network::{Edge, FlowNetwork, Node, NodeRole};
pub use production::{Product, ProductionResource};
pub use schedule::{EdgeFlow, MissionSchedule, ScheduledMission, ShiftAssignment, ShiftRoster};
pub use staffing::Candidate;
