pub mod catalog;
pub mod course;
pub mod source;

pub use catalog::Catalog;
pub use course::{Course, CourseId};
pub use source::{
    load_catalog, load_with_fallback, sample_catalog, CatalogError, CatalogSource, Fallback,
    LoadedCatalog,
};
