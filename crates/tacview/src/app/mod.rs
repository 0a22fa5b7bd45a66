mod bootstrap;
mod skirmish;

pub(crate) use bootstrap::build_app;
