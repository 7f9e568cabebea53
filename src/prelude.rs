//! Till prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    catalog::{Catalog, CatalogError, ItemUpdate},
    discounts::{
        BulkDiscount, Bundle, BundleDiscount, Discount, DiscountError, DiscountId, DiscountKind,
        DiscountPatch, DiscountTarget, DiscountValue, ProgressiveDiscount,
    },
    engine::{DiscountEngine, DiscountOrder, PricingOutcome},
    fixtures::{FixtureError, TillFixture},
    items::{Claim, Item},
    pricing::TotalPriceError,
    receipt::{Denomination, Receipt, ReceiptError},
    system::{DEFAULT_MAX_DISCOUNTS, Sale, System, SystemError},
    validation::ValidationError,
};
