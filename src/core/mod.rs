mod error;
mod formulas;
mod table;
mod types;

pub use error::CalcError;
pub use formulas::{
    cagr, elss_lumpsum, elss_monthly, emi, fire_targets, goal_planning, lumpsum_future_value,
    retirement_plan, sip_future_value, swp_schedule,
};
pub use table::{Cell, Page, SortConfig, SortOrder, TableRow, filter_rows, paginate, sort_rows};
pub use types::{
    EmiResult, FireResult, GoalPlanResult, GrowthResult, RetirementResult, SwpMonth, SwpResult,
};
