use serde::Serialize;

/// Outcome of a recurring or one-shot investment projection (SIP, ELSS).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub invested: f64,
    pub future_value: f64,
    pub returns: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiResult {
    pub emi: f64,
    pub total_interest: f64,
    pub total_amount: f64,
}

/// One month of a systematic withdrawal schedule, recorded after the
/// month's interest accrual and withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwpMonth {
    pub month: u32,
    pub interest: f64,
    pub withdrawal: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwpResult {
    pub total_withdrawn: f64,
    pub remaining_balance: f64,
    pub months: Vec<SwpMonth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub corpus_required: f64,
    pub monthly_savings_required: f64,
}

/// Corpus targets for the usual FIRE flavours. `coast` is the amount that
/// grows into the lean target by retirement with no further contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireResult {
    pub lean: f64,
    pub standard: f64,
    pub fat: f64,
    pub coast: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlanResult {
    pub future_goal: f64,
    pub future_existing: f64,
    pub monthly_required: f64,
}
