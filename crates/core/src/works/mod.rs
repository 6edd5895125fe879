//! Works module - installation jobs created from paid budgets.

mod works_model;
mod works_service;
mod works_traits;


pub use works_model::{
    BudgetSummary, NewWork, Work, WorkDetail, WorkFilter, WorkStatus, WorkStatusUpdate, WorkUpdate,
};
pub use works_service::WorkService;
pub use works_traits::{WorkRepositoryTrait, WorkServiceTrait};
