//! Generated source modules for the consuming application.
//!
//! The build command writes three artifacts next to the sprite files: a
//! paths module (sprite name → URL plus runtime options), a data module
//! (symbol lookup tables), and a type declaration enumerating the valid
//! symbol ids.

use serde_json::{Map, Value, json};

use crate::config::RuntimeOptions;

use super::collector::{Collector, SymbolData};

pub const PATHS_FILE: &str = "sprite.paths.js";
pub const DATA_FILE: &str = "sprite.data.js";
pub const TYPES_FILE: &str = "sprite.d.ts";

fn attributes_json(attributes: &[(String, String)]) -> Value {
    let mut map = Map::new();
    for (key, value) in attributes {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

fn symbol_data_json(data: &SymbolData) -> Value {
    json!({
        "dom": data.dom,
        "attributes": attributes_json(&data.attributes),
    })
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// `sprite.paths.js`: sprite name → URL map plus pass-through runtime
/// options.
pub fn paths_module(
    collector: &Collector,
    asset_prefix: &str,
    runtime: &RuntimeOptions,
) -> String {
    let paths = Value::Object(
        collector
            .sprite_paths(asset_prefix)
            .into_iter()
            .map(|(name, path)| (name, Value::String(path)))
            .collect(),
    );
    let options = serde_json::to_value(runtime).unwrap_or(Value::Null);

    format!(
        "export const SPRITE_PATHS = {};\n\nexport const runtimeOptions = {};\n",
        pretty(&paths),
        pretty(&options)
    )
}

/// `sprite.data.js`: symbol id enumeration, id → markup/attributes table,
/// and the full per-sprite document contents.
pub fn data_module(collector: &Collector) -> String {
    let data = collector.symbol_data();

    let keys = Value::Array(
        data.keys()
            .map(|id| Value::String(id.clone()))
            .collect(),
    );
    let doms = Value::Object(
        data.iter()
            .map(|(id, symbol)| (id.clone(), symbol_data_json(symbol)))
            .collect(),
    );
    let sprites = Value::Object(
        collector
            .sprite_contents()
            .into_iter()
            .map(|(name, markup)| (name, Value::String(markup)))
            .collect(),
    );

    format!(
        "export const ALL_SYMBOL_KEYS = {};\n\n\
         export const ALL_SYMBOL_DOMS = {};\n\n\
         export const ALL_SPRITES = {};\n",
        pretty(&keys),
        pretty(&doms),
        pretty(&sprites)
    )
}

/// `sprite.d.ts`: the union type of all valid symbol ids.
pub fn types_module(collector: &Collector) -> String {
    let ids: Vec<String> = collector
        .symbol_sprite_map()
        .into_keys()
        .map(|id| serde_json::to_string(&id).unwrap_or_default())
        .collect();

    let union = if ids.is_empty() {
        "never".to_string()
    } else {
        ids.join("\n    | ")
    };

    format!(
        "declare module 'spriteforge/runtime' {{\n\
         \x20 /**\n\
         \x20  * Keys of all generated sprite symbols.\n\
         \x20  */\n\
         \x20 export type SpriteSymbolId =\n\
         \x20   | {union}\n\
         \n\
         \x20 export type RuntimeOptions = {{\n\
         \x20   ariaHidden: boolean\n\
         \x20 }}\n\
         \n\
         \x20 export const SPRITE_PATHS: Record<string, string>\n\
         \x20 export const runtimeOptions: RuntimeOptions\n\
         }}\n"
    )
}
