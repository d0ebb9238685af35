use posemaster_core::image_ref::ImageRef;
use posemaster_core::selection::{HeadCount, SceneSelection, StyleSelection};

/// Returns the built-in scene presets offered in step one.
pub fn default_scenes() -> Vec<SceneSelection> {
    [
        ("s1", "https://picsum.photos/id/10/800/600", "宁静的森林公园"),
        ("s2", "https://picsum.photos/id/42/800/600", "现代都市咖啡馆"),
        ("s3", "https://picsum.photos/id/180/800/600", "复古书房"),
        ("s4", "https://picsum.photos/id/212/800/600", "街头涂鸦墙"),
    ]
    .into_iter()
    .map(|(id, url, description)| SceneSelection::preset(id, ImageRef::remote(url), description))
    .collect()
}

/// Returns the built-in style presets offered in step two, with the given head count.
pub fn default_styles(head_count: HeadCount) -> Vec<StyleSelection> {
    [
        ("st1", "https://picsum.photos/id/338/400/400", "日系小清新，棉麻质感"),
        ("st2", "https://picsum.photos/id/435/400/400", "欧美街拍，时尚潮流"),
        ("st3", "https://picsum.photos/id/660/400/400", "极简商务，职业干练"),
        ("st4", "https://picsum.photos/id/823/400/400", "复古港风，浓郁色彩"),
    ]
    .into_iter()
    .map(|(id, url, description)| {
        StyleSelection::preset(id, ImageRef::remote(url), description, head_count)
    })
    .collect()
}

pub fn find_scene(id: &str) -> Option<SceneSelection> {
    default_scenes().into_iter().find(|scene| scene.id == id)
}

pub fn find_style(id: &str, head_count: HeadCount) -> Option<StyleSelection> {
    default_styles(head_count)
        .into_iter()
        .find(|style| style.id == id)
}
