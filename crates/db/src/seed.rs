//! Built-in character data for Twelfth Night (《第十二夜》).

use crate::models::character::CreateCharacter;
use crate::repositories::character_repo::insert_character;
use crate::MemStore;

/// Play name shared by every seeded character.
pub const TWELFTH_NIGHT: &str = "第十二夜";

/// Placeholder avatar served for seeded characters.
const PLACEHOLDER_AVATAR: &str = "/api/placeholder/150/150";

/// The seeded cast, in id order.
pub fn twelfth_night_cast() -> Vec<CreateCharacter> {
    [
        (
            "薇奥拉",
            "聪明机智的女主角，化名塞巴斯蒂安为奥西诺公爵服务",
            "聪明、勇敢、忠诚、机智",
            "因船难失散，女扮男装投靠奥西诺公爵",
        ),
        (
            "奥西诺公爵",
            "伊利里亚的统治者，深情的贵族",
            "浪漫、深情、有些自恋",
            "伊利里亚公爵，痴恋奥丽维亚",
        ),
        (
            "奥丽维亚",
            "美丽的女伯爵，为兄长守孝",
            "高傲、美丽、情感丰富",
            "富有的女伯爵，拒绝奥西诺的求爱",
        ),
        (
            "马伏里奥",
            "奥丽维亚的管家，自负且严肃",
            "自负、严肃、有野心",
            "奥丽维亚家的管家，梦想飞黄腾达",
        ),
    ]
    .into_iter()
    .map(|(name, description, personality, background)| CreateCharacter {
        name: name.to_string(),
        description: Some(description.to_string()),
        avatar: Some(PLACEHOLDER_AVATAR.to_string()),
        personality: Some(personality.to_string()),
        background: Some(background.to_string()),
        play_name: TWELFTH_NIGHT.to_string(),
    })
    .collect()
}

/// Insert the cast into a store that has not been shared yet.
pub fn seed_characters(store: &mut MemStore) {
    for input in twelfth_night_cast() {
        let id = store.allocate_id();
        insert_character(store.tables_mut(), id, &input);
    }
}
