pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

#[cfg(test)]
mod test_support;

pub fn init(verbosity: u8) {
    infra::logging::init(verbosity);
}
