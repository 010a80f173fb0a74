//! JSON adapters: serde databind and a hand-built tree variant.
//!
//! The databind entry maps the domain type straight through serde derive.
//! The tree entry goes the long way round — domain object to
//! `serde_json::Value` by hand, then `Value` over the wire — exercising the
//! non-identity transformer path the way manual-tree codecs do.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use serbench_core::{
    Codec, CodecEntry, CodecFailure, Direct, Image, Media, MediaContent, Player, RegistryBuilder,
    Size, TransformFailure, Transformer,
};

/// UTF-8 JSON text via serde derive.
pub struct JsonCodec<T>(PhantomData<fn() -> T>);

impl<T> JsonCodec<T> {
    pub fn new() -> Self {
        JsonCodec(PhantomData)
    }
}

impl<T> Default for JsonCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize + DeserializeOwned> Codec for JsonCodec<T> {
    type Native = T;

    fn name(&self) -> &str {
        "json/serde/databind"
    }

    fn serialize(&self, native: &T) -> Result<Vec<u8>, CodecFailure> {
        serde_json::to_vec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<T, CodecFailure> {
        serde_json::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// JSON text with `serde_json::Value` as the native representation.
pub struct JsonTreeCodec;

impl Codec for JsonTreeCodec {
    type Native = Value;

    fn name(&self) -> &str {
        "json/serde/tree"
    }

    fn serialize(&self, native: &Value) -> Result<Vec<u8>, CodecFailure> {
        serde_json::to_vec(native).map_err(CodecFailure::library)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecFailure> {
        serde_json::from_slice(bytes).map_err(CodecFailure::library)
    }
}

/// Hand-written `MediaContent` ⇄ `serde_json::Value` transformer.
///
/// Field names match the derive layout so the two JSON entries produce
/// comparable payloads.
pub struct MediaTreeTransformer;

impl Transformer for MediaTreeTransformer {
    type Domain = MediaContent;
    type Native = Value;

    fn forward(&self, value: &MediaContent) -> Result<Value, TransformFailure> {
        let media = &value.media;
        let images: Vec<Value> = value
            .images
            .iter()
            .map(|img| {
                json!({
                    "uri": img.uri,
                    "title": img.title,
                    "width": img.width,
                    "height": img.height,
                    "size": size_name(img.size),
                })
            })
            .collect();

        Ok(json!({
            "media": {
                "uri": media.uri,
                "title": media.title,
                "width": media.width,
                "height": media.height,
                "format": media.format,
                "duration": media.duration,
                "size": media.size,
                "bitrate": media.bitrate,
                "persons": media.persons,
                "player": player_name(media.player),
                "copyright": media.copyright,
            },
            "images": images,
        }))
    }

    fn reverse(&self, native: Value) -> Result<MediaContent, TransformFailure> {
        let root = as_object(&native, "<root>")?;
        let media_obj = as_object(field(root, "media")?, "media")?;

        let media = Media {
            uri: str_field(media_obj, "media.uri")?,
            title: opt_str_field(media_obj, "media.title")?,
            width: i32_field(media_obj, "media.width")?,
            height: i32_field(media_obj, "media.height")?,
            format: str_field(media_obj, "media.format")?,
            duration: i64_field(media_obj, "media.duration")?,
            size: i64_field(media_obj, "media.size")?,
            bitrate: opt_i32_field(media_obj, "media.bitrate")?,
            persons: str_list_field(media_obj, "media.persons")?,
            player: player_from(&str_field(media_obj, "media.player")?)?,
            copyright: opt_str_field(media_obj, "media.copyright")?,
        };

        let images = field(root, "images")?
            .as_array()
            .ok_or_else(|| TransformFailure::InvalidField("images".to_string()))?
            .iter()
            .map(|img| {
                let obj = as_object(img, "images[]")?;
                Ok(Image {
                    uri: str_field(obj, "images[].uri")?,
                    title: opt_str_field(obj, "images[].title")?,
                    width: i32_field(obj, "images[].width")?,
                    height: i32_field(obj, "images[].height")?,
                    size: size_from(&str_field(obj, "images[].size")?)?,
                })
            })
            .collect::<Result<Vec<_>, TransformFailure>>()?;

        Ok(MediaContent { media, images })
    }
}

fn player_name(player: Player) -> &'static str {
    match player {
        Player::Java => "java",
        Player::Flash => "flash",
    }
}

fn player_from(name: &str) -> Result<Player, TransformFailure> {
    match name {
        "java" => Ok(Player::Java),
        "flash" => Ok(Player::Flash),
        other => Err(TransformFailure::InvalidField(format!("media.player: {other}"))),
    }
}

fn size_name(size: Size) -> &'static str {
    match size {
        Size::Small => "small",
        Size::Large => "large",
    }
}

fn size_from(name: &str) -> Result<Size, TransformFailure> {
    match name {
        "small" => Ok(Size::Small),
        "large" => Ok(Size::Large),
        other => Err(TransformFailure::InvalidField(format!("images[].size: {other}"))),
    }
}

fn as_object<'a>(value: &'a Value, key: &str) -> Result<&'a Map<String, Value>, TransformFailure> {
    value
        .as_object()
        .ok_or_else(|| TransformFailure::InvalidField(format!("{key}: not an object")))
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, TransformFailure> {
    obj.get(key)
        .ok_or_else(|| TransformFailure::InvalidField(key.to_string()))
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Result<String, TransformFailure> {
    let name = key.rsplit('.').next().unwrap_or(key);
    field(obj, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TransformFailure::InvalidField(key.to_string()))
}

fn opt_str_field(obj: &Map<String, Value>, key: &str) -> Result<Option<String>, TransformFailure> {
    let name = key.rsplit('.').next().unwrap_or(key);
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(TransformFailure::InvalidField(key.to_string())),
    }
}

fn i64_field(obj: &Map<String, Value>, key: &str) -> Result<i64, TransformFailure> {
    let name = key.rsplit('.').next().unwrap_or(key);
    field(obj, name)?
        .as_i64()
        .ok_or_else(|| TransformFailure::InvalidField(key.to_string()))
}

fn i32_field(obj: &Map<String, Value>, key: &str) -> Result<i32, TransformFailure> {
    i64_field(obj, key)?
        .try_into()
        .map_err(|_| TransformFailure::InvalidField(format!("{key}: out of i32 range")))
}

fn opt_i32_field(obj: &Map<String, Value>, key: &str) -> Result<Option<i32>, TransformFailure> {
    let name = key.rsplit('.').next().unwrap_or(key);
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let n = v
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| TransformFailure::InvalidField(key.to_string()))?;
            Ok(Some(n))
        }
    }
}

fn str_list_field(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, TransformFailure> {
    let name = key.rsplit('.').next().unwrap_or(key);
    field(obj, name)?
        .as_array()
        .ok_or_else(|| TransformFailure::InvalidField(key.to_string()))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| TransformFailure::InvalidField(format!("{key}: non-string item")))
        })
        .collect()
}

/// Register the JSON family.
pub fn register(builder: &mut RegistryBuilder<MediaContent>) {
    builder.register(
        "json",
        vec![
            CodecEntry::new(JsonCodec::new(), Direct::new()),
            CodecEntry::new(JsonTreeCodec, MediaTreeTransformer),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serbench_core::{verify, Stage};

    #[test]
    fn test_databind_round_trip() {
        let entry = CodecEntry::new(JsonCodec::new(), Direct::new());
        let outcome = verify(&entry, &MediaContent::standard_sample());
        assert_eq!(outcome.stage, Stage::Success, "outcome: {outcome:?}");
    }

    #[test]
    fn test_tree_round_trip() {
        let entry = CodecEntry::new(JsonTreeCodec, MediaTreeTransformer);
        let outcome = verify(&entry, &MediaContent::standard_sample());
        assert_eq!(outcome.stage, Stage::Success, "outcome: {outcome:?}");
    }

    #[test]
    fn test_tree_and_databind_produce_identical_payloads() {
        let sample = MediaContent::standard_sample();
        let tree = MediaTreeTransformer.forward(&sample).expect("forward");
        let derive = serde_json::to_value(&sample).expect("derive to value");
        assert_eq!(tree, derive, "manual tree must mirror the derive layout");
    }

    #[test]
    fn test_reverse_rejects_missing_field() {
        let sample = MediaContent::standard_sample();
        let mut tree = MediaTreeTransformer.forward(&sample).expect("forward");
        tree["media"]
            .as_object_mut()
            .expect("media object")
            .remove("format");

        let err = MediaTreeTransformer.reverse(tree).expect_err("missing format");
        assert!(err.to_string().contains("media.format"), "err: {err}");
    }

    #[test]
    fn test_reverse_rejects_unknown_player() {
        let sample = MediaContent::standard_sample();
        let mut tree = MediaTreeTransformer.forward(&sample).expect("forward");
        tree["media"]["player"] = json!("realplayer");

        let err = MediaTreeTransformer.reverse(tree).expect_err("unknown player");
        assert!(err.to_string().contains("realplayer"), "err: {err}");
    }

    #[test]
    fn test_tree_reverse_preserves_absent_bitrate() {
        let mut sample = MediaContent::standard_sample();
        sample.media.bitrate = None;
        let tree = MediaTreeTransformer.forward(&sample).expect("forward");
        let back = MediaTreeTransformer.reverse(tree).expect("reverse");
        assert_eq!(back, sample);
    }
}
