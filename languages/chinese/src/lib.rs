pub mod alignment;
pub mod dictionary;
pub mod loader;
pub mod processor;
pub mod prompt;
pub mod tone;
pub mod translator;

pub use dictionary::HanziDictionary;
pub use loader::HanziLoader;
pub use processor::ChineseProcessor;
pub use translator::OpenAiTranslator;
