//! Prompt construction for character chat and script generation.
//!
//! System prompts are always assembled server-side from the stored
//! character record; clients only send the dialogue history.

use serde::{Deserialize, Serialize};

use crate::chat::Message;

/// Sampling temperature for in-character chat.
pub const CHAT_TEMPERATURE: f32 = 0.9;

/// Sampling temperature for script generation.
pub const SCRIPT_TEMPERATURE: f32 = 0.8;

/// User prompt used when script generation is started without a seed.
pub const FALLBACK_SCRIPT_PROMPT: &str = "请基于角色信息生成一个开场剧本。";

/// The identity fields of a character that feed into prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub background: String,
}

/// What a completion request is for. Selects system prompt and temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    Chat,
    Script,
}

impl CompletionKind {
    pub fn temperature(self) -> f32 {
        match self {
            CompletionKind::Chat => CHAT_TEMPERATURE,
            CompletionKind::Script => SCRIPT_TEMPERATURE,
        }
    }

    pub fn system_prompt(self, profile: &CharacterProfile) -> Message {
        match self {
            CompletionKind::Chat => chat_system_prompt(profile),
            CompletionKind::Script => script_system_prompt(profile),
        }
    }
}

/// System prompt keeping the model in character.
pub fn chat_system_prompt(profile: &CharacterProfile) -> Message {
    Message::system(format!(
        "你现在是一个名为「{}」的角色。你是：{}。你性格是：{}。背景是：{}。\
         请完全以该角色风格进行回答，不要跳出角色。",
        profile.name, profile.description, profile.personality, profile.background
    ))
}

/// System prompt asking for stage-script formatted output.
pub fn script_system_prompt(profile: &CharacterProfile) -> Message {
    Message::system(format!(
        "你是舞台剧编剧助手，请用舞台剧脚本格式输出。\
         角色名：{}；设定：{}；性格：{}；背景：{}。格式建议：\n\
         舞台指示用【】或（）；台词用“角色名：内容”。",
        profile.name, profile.description, profile.personality, profile.background
    ))
}

/// Seed prompt sent when a script is generated from a chat session.
pub fn default_script_seed(profile: &CharacterProfile) -> String {
    format!(
        "以舞台剧剧本格式生成一段剧情开场：\n\
         角色名：{}\n\
         人物设定：{}\n\
         性格特征：{}\n\
         背景故事：{}\n\
         要求：以对话为主，加入舞台指示（灯光/音效/走位），中文，长度约 100 字。",
        profile.name, profile.description, profile.personality, profile.background
    )
}
