mod loader;
mod structs;


pub use loader::{config_path, load_config, load_config_from, load_file_config, save_config};
pub use structs::{AppConfig, Language, NetworkConfig, ProviderKind, UIConfig};

/// 脱敏显示 API key
///
/// 长度超过 8 时保留首尾各 4 个字符，否则全部隐藏。
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "***".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
