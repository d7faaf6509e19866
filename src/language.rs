use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

pub const NO_EXTENSION: &str = "(no ext)";

static EXTENSIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (".py", "Python"),
        (".js", "JavaScript"),
        (".ts", "TypeScript"),
        (".jsx", "React JSX"),
        (".tsx", "React TSX"),
        (".go", "Go"),
        (".rs", "Rust"),
        (".rb", "Ruby"),
        (".java", "Java"),
        (".kt", "Kotlin"),
        (".swift", "Swift"),
        (".c", "C"),
        (".cpp", "C++"),
        (".h", "C/C++ Header"),
        (".cs", "C#"),
        (".php", "PHP"),
        (".dart", "Dart"),
        (".html", "HTML"),
        (".css", "CSS"),
        (".scss", "SCSS"),
        (".json", "JSON"),
        (".yaml", "YAML"),
        (".yml", "YAML"),
        (".toml", "TOML"),
        (".xml", "XML"),
        (".md", "Markdown"),
        (".txt", "Text"),
        (".sh", "Shell"),
        (".bash", "Shell"),
        (".zsh", "Shell"),
        (".sql", "SQL"),
        (".r", "R"),
        (".lua", "Lua"),
        (".ex", "Elixir"),
        (".exs", "Elixir"),
        (".erl", "Erlang"),
        (".zig", "Zig"),
        (".nim", "Nim"),
        (".v", "V"),
        (".sol", "Solidity"),
        (".vue", "Vue"),
        (".svelte", "Svelte"),
    ])
});

/// Display name for an extension such as `.rs`. Unknown extensions come
/// back unchanged so every view labels the same file the same way.
pub fn language_for(ext: &str) -> &str {
    EXTENSIONS.get(ext).copied().unwrap_or(ext)
}

/// Lower-cased extension with its leading dot, or [`NO_EXTENSION`].
pub fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(|s| format!(".{}", s.to_lowercase()))
        .unwrap_or_else(|| NO_EXTENSION.to_string())
}
