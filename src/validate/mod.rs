pub(crate) mod attributes;
pub(crate) mod mask;
pub(crate) mod options;
pub(crate) mod orchestrator;
pub(crate) mod pointers;
pub(crate) mod report;
pub(crate) mod streams;
pub(crate) mod tags;
