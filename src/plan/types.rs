//! Query plan value objects
//!
//! Plans arrive fully formed from the external planner and are never mutated
//! during execution. Year-over-year execution derives a new `Filters` value
//! with the time anchors shifted back one year; the caller's plan is left
//! untouched.

use serde::{Deserialize, Serialize};

use crate::dataset::Dimension;

use super::errors::{PlanError, PlanResult};

/// The kind of computation requested. Closed set: anything else is handled
/// upstream and never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    TotalSales,
    TotalActiveStores,
    Breakdown,
    CompareYoy,
    TopN,
}

/// The measure a plan computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Sales,
    ActiveStores,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::ActiveStores => "active_stores",
        }
    }
}

/// Grouping key for BREAKDOWN and TOP_N: either the normalized period column
/// or one of the catalog dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    #[serde(rename = "month")]
    Month,
    #[serde(untagged)]
    Dimension(Dimension),
}

/// Filter record: optional categorical dimension values plus time anchors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub brand: Option<String>,
    pub category: Option<String>,
    pub product: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub channel: Option<String>,
    pub sub_channel: Option<String>,
    pub salesman: Option<String>,
    pub customer: Option<String>,
    pub customer_account_name: Option<String>,
    pub retailer_group: Option<String>,
    pub retailer_sub_group: Option<String>,
    pub master_distributor: Option<String>,
    pub distributor: Option<String>,
    pub line_of_business: Option<String>,
    pub supplier: Option<String>,
    pub agency: Option<String>,
    pub segment: Option<String>,
    pub sub_brand: Option<String>,
    pub promo: Option<String>,

    /// Single period, `YYYY-MM`.
    pub month: Option<String>,
    /// Set of periods, each `YYYY-MM`.
    pub months: Option<Vec<String>>,
    /// Quarter key, `YYYY-Q#`.
    pub quarter: Option<String>,
    /// Calendar year.
    pub year: Option<i32>,
}

impl Filters {
    /// Raw filter value for a dimension, if set.
    pub fn dimension(&self, dimension: Dimension) -> Option<&str> {
        let value = match dimension {
            Dimension::Brand => &self.brand,
            Dimension::Category => &self.category,
            Dimension::Product => &self.product,
            Dimension::Country => &self.country,
            Dimension::City => &self.city,
            Dimension::Area => &self.area,
            Dimension::Channel => &self.channel,
            Dimension::SubChannel => &self.sub_channel,
            Dimension::Salesman => &self.salesman,
            Dimension::Customer => &self.customer,
            Dimension::CustomerAccountName => &self.customer_account_name,
            Dimension::RetailerGroup => &self.retailer_group,
            Dimension::RetailerSubGroup => &self.retailer_sub_group,
            Dimension::MasterDistributor => &self.master_distributor,
            Dimension::Distributor => &self.distributor,
            Dimension::LineOfBusiness => &self.line_of_business,
            Dimension::Supplier => &self.supplier,
            Dimension::Agency => &self.agency,
            Dimension::Segment => &self.segment,
            Dimension::SubBrand => &self.sub_brand,
            Dimension::Promo => &self.promo,
        };
        value.as_deref()
    }

    /// Number of populated time anchors among month, months, quarter, year.
    pub fn time_anchor_count(&self) -> usize {
        let mut count = 0;
        if self.month.as_deref().is_some_and(|m| !m.is_empty()) {
            count += 1;
        }
        if self.months.as_deref().is_some_and(|m| !m.is_empty()) {
            count += 1;
        }
        if self.quarter.as_deref().is_some_and(|q| !q.is_empty()) {
            count += 1;
        }
        if self.year.is_some() {
            count += 1;
        }
        count
    }

    /// Derives a copy with every time anchor shifted back exactly one year.
    ///
    /// Month and quarter numbers are unchanged; only the year component is
    /// decremented. Dimension filters are carried over as-is.
    pub fn shifted_back_one_year(&self) -> PlanResult<Filters> {
        let mut shifted = self.clone();
        if let Some(month) = &self.month {
            shifted.month = Some(shift_period(month)?);
        }
        if let Some(months) = &self.months {
            shifted.months = Some(
                months
                    .iter()
                    .map(|m| shift_period(m))
                    .collect::<PlanResult<Vec<_>>>()?,
            );
        }
        if let Some(quarter) = &self.quarter {
            shifted.quarter = Some(shift_quarter(quarter)?);
        }
        if let Some(year) = self.year {
            shifted.year = Some(year - 1);
        }
        Ok(shifted)
    }
}

/// Shifts a `YYYY-MM` period key back one year.
fn shift_period(period: &str) -> PlanResult<String> {
    let (year, month) = period
        .split_once('-')
        .ok_or_else(|| PlanError::InvalidTimeFilter(period.to_string()))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidTimeFilter(period.to_string()))?;
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidTimeFilter(period.to_string()))?;
    Ok(format!("{:04}-{:02}", year - 1, month))
}

/// Shifts a `YYYY-Q#` quarter key back one year.
fn shift_quarter(quarter: &str) -> PlanResult<String> {
    let (year, number) = quarter
        .split_once("-Q")
        .ok_or_else(|| PlanError::InvalidTimeFilter(quarter.to_string()))?;
    let year: i32 = year
        .trim()
        .parse()
        .map_err(|_| PlanError::InvalidTimeFilter(quarter.to_string()))?;
    Ok(format!("{:04}-Q{}", year - 1, number))
}

/// One validated unit of work for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub intent: Intent,
    #[serde(default)]
    pub metric: Option<Metric>,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub group_by: Option<GroupBy>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub clarification_question: Option<String>,
}

impl QueryPlan {
    /// Creates a plan with the given intent and everything else unset.
    pub fn new(intent: Intent) -> Self {
        Self {
            intent,
            metric: None,
            filters: Filters::default(),
            group_by: None,
            limit: None,
            clarification_question: None,
        }
    }
}
