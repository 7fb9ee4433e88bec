//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{AttributeName, DynamicEntityModel, TypeCategory};

impl DynamicEntityModel {
    pub(crate) fn ensure_category(&self, attribute: &AttributeName) -> TypeCategory {
        self.categories.get(attribute).copied().unwrap_or_else(|| {
            panic!(
                "DynamicEntityModel: attribute `{attribute}` listed without a category \
                 (attributes and categories must be inserted together)"
            )
        })
    }
}
