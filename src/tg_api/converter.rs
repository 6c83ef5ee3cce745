use crate::domain::{Message, TextSpan};
use grammers_client::types;
use grammers_tl_types as tl;

pub fn message(message: &types::Message) -> Message {
    let entities = message
        .fmt_entities()
        .map(|entities| entities.iter().filter_map(text_span).collect())
        .unwrap_or_default();

    Message {
        id: message.id(),
        text: message.text().to_owned(),
        entities,
        posted_at: Some(message.date()),
    }
}

/// Keeps only link entities. Negative offsets or lengths become `None`.
fn text_span(entity: &tl::enums::MessageEntity) -> Option<TextSpan> {
    match entity {
        tl::enums::MessageEntity::TextUrl(entity) => Some(TextSpan {
            explicit_url: Some(entity.url.clone()),
            offset: usize::try_from(entity.offset).ok(),
            length: usize::try_from(entity.length).ok(),
        }),
        tl::enums::MessageEntity::Url(entity) => Some(TextSpan {
            explicit_url: None,
            offset: usize::try_from(entity.offset).ok(),
            length: usize::try_from(entity.length).ok(),
        }),
        _ => None,
    }
}
