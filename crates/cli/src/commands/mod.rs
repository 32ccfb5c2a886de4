mod query;
mod resolve;
mod serve;

pub use query::query;
pub use resolve::resolve;
pub use serve::serve;

use serde::Serialize;

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
