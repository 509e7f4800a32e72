pub mod builtin;

pub use builtin::{
    business_strategist, coordinator, corporate_attorney, squad, squad_with_model, tax_cpa,
    DEFAULT_MODEL,
};
