pub mod call_site;
pub mod definitions;
pub mod plugin;

use minijinja::Environment;

/// Template environment shared by the module emitters.
pub(crate) fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_keep_trailing_newline(true);
    env
}
