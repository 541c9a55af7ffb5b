pub mod extract;
pub mod mappings;
pub mod networks;
pub mod path;
pub mod serve;
pub mod taxonomy;

pub(crate) fn print_json<T: serde::Serialize>(value: &T, pretty: bool) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("ERROR: failed to serialize to JSON: {}", e),
    }
}
