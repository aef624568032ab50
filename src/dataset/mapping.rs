//! Column mapping between logical dimensions and physical dataset columns
//!
//! The mapping is resolved once at load time and never changes afterwards.
//! Absence of a dimension is tracked explicitly: a dimension not present in
//! the mapping has no physical column in this dataset, and the engines never
//! fall back to guessing one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed catalog of categorical dimensions a dataset may carry.
///
/// Every dimension is optional per dataset; presence is recorded in
/// [`ColumnMapping`], not inferred from cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Brand,
    Category,
    Product,
    Country,
    City,
    Area,
    Channel,
    SubChannel,
    Salesman,
    Customer,
    CustomerAccountName,
    RetailerGroup,
    RetailerSubGroup,
    MasterDistributor,
    Distributor,
    LineOfBusiness,
    Supplier,
    Agency,
    Segment,
    SubBrand,
    Promo,
}

impl Dimension {
    /// All dimensions, in catalog order.
    pub const ALL: [Dimension; 21] = [
        Dimension::Brand,
        Dimension::Category,
        Dimension::Product,
        Dimension::Country,
        Dimension::City,
        Dimension::Area,
        Dimension::Channel,
        Dimension::SubChannel,
        Dimension::Salesman,
        Dimension::Customer,
        Dimension::CustomerAccountName,
        Dimension::RetailerGroup,
        Dimension::RetailerSubGroup,
        Dimension::MasterDistributor,
        Dimension::Distributor,
        Dimension::LineOfBusiness,
        Dimension::Supplier,
        Dimension::Agency,
        Dimension::Segment,
        Dimension::SubBrand,
        Dimension::Promo,
    ];

    /// Logical name, matching the plan schema's field names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Brand => "brand",
            Dimension::Category => "category",
            Dimension::Product => "product",
            Dimension::Country => "country",
            Dimension::City => "city",
            Dimension::Area => "area",
            Dimension::Channel => "channel",
            Dimension::SubChannel => "sub_channel",
            Dimension::Salesman => "salesman",
            Dimension::Customer => "customer",
            Dimension::CustomerAccountName => "customer_account_name",
            Dimension::RetailerGroup => "retailer_group",
            Dimension::RetailerSubGroup => "retailer_sub_group",
            Dimension::MasterDistributor => "master_distributor",
            Dimension::Distributor => "distributor",
            Dimension::LineOfBusiness => "line_of_business",
            Dimension::Supplier => "supplier",
            Dimension::Agency => "agency",
            Dimension::Segment => "segment",
            Dimension::SubBrand => "sub_brand",
            Dimension::Promo => "promo",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static resolution of logical names to physical column identifiers.
///
/// Built once by the loader, immutable for the process lifetime. A dimension
/// missing from `dimensions` is explicitly absent from the dataset.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Physical column holding the numeric sales value, if any.
    sales: Option<String>,
    /// Physical column the store identifier was derived from.
    store: String,
    /// Physical column per present dimension.
    dimensions: BTreeMap<Dimension, String>,
}

impl ColumnMapping {
    /// Creates a mapping from resolved physical column names.
    pub fn new(
        sales: Option<String>,
        store: impl Into<String>,
        dimensions: BTreeMap<Dimension, String>,
    ) -> Self {
        Self {
            sales,
            store: store.into(),
            dimensions,
        }
    }

    /// Physical sales column, or None when the dataset has no sales metric.
    pub fn sales_column(&self) -> Option<&str> {
        self.sales.as_deref()
    }

    /// Physical store identifier column.
    pub fn store_column(&self) -> &str {
        &self.store
    }

    /// Physical column for a dimension, or None when explicitly absent.
    pub fn dimension_column(&self, dimension: Dimension) -> Option<&str> {
        self.dimensions.get(&dimension).map(String::as_str)
    }

    /// Returns true if the dimension has a physical column in this dataset.
    pub fn has_dimension(&self, dimension: Dimension) -> bool {
        self.dimensions.contains_key(&dimension)
    }

    /// Dimensions present in this dataset, in catalog order.
    pub fn present_dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.dimensions.keys().copied()
    }
}
