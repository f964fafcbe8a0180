//! State threaded through a load.

use crate::factory::Factory;
use crate::options::LoadOptions;

/// Outcome of a successful load.
///
/// Unknown component types do not fail a load (unless the options say so);
/// they are listed here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of components created and read, nested ones included.
    pub loaded_count: usize,
    /// Type tags of skipped entries, in document order.
    pub skipped_types: Vec<String>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped_types.len()
    }

    /// Whether every entry in the document was loaded.
    pub fn is_complete(&self) -> bool {
        self.skipped_types.is_empty()
    }
}

/// Factory, options and running report for one load.
///
/// Passed down to every [`Component::deserialize_from`](crate::component::Component::deserialize_from)
/// so that composite components can create their children.
#[derive(Debug)]
pub struct LoadContext<'a> {
    factory: &'a Factory,
    options: &'a LoadOptions,
    report: LoadReport,
}

impl<'a> LoadContext<'a> {
    pub fn new(factory: &'a Factory, options: &'a LoadOptions) -> Self {
        Self {
            factory,
            options,
            report: LoadReport::default(),
        }
    }

    pub fn factory(&self) -> &'a Factory {
        self.factory
    }

    pub fn options(&self) -> &'a LoadOptions {
        self.options
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn into_report(self) -> LoadReport {
        self.report
    }

    pub(crate) fn record_loaded(&mut self) {
        self.report.loaded_count += 1;
    }

    pub(crate) fn record_skipped(&mut self, type_tag: &str) {
        self.report.skipped_types.push(type_tag.to_owned());
    }
}
