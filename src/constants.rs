pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
pub const CAPTION_EXTENSION: &str = "txt";
pub const DESCRIBE_PROMPT: &str = "Describe this image.";
pub const ENFORCEMENT_PROMPT: &str = "\nIMPORTANT: Output ONLY the raw caption text. Do not add conversational filler like 'Here is the description'.";
pub const FILENAME_SEPARATORS: [char; 2] = ['_', '-'];
