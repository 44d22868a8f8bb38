use starfield_core::{Item, Msg};

#[derive(Debug, Clone)]
pub struct Incoming {
    pub stream: String,
    pub kind: IncomingKind,
}

#[derive(Debug, Clone)]
pub enum IncomingKind {
    Connected,
    Disconnected,
    Catalog(Vec<Item>),
    ItemUpdated(Item),
    Other(Msg),
    Error(String),
}

impl Incoming {
    pub fn connected(stream: String) -> Self {
        Self {
            stream,
            kind: IncomingKind::Connected,
        }
    }

    pub fn disconnected(stream: String) -> Self {
        Self {
            stream,
            kind: IncomingKind::Disconnected,
        }
    }

    pub fn error(stream: String, msg: String) -> Self {
        Self {
            stream,
            kind: IncomingKind::Error(msg),
        }
    }

    pub fn from_msg(stream: String, msg: Msg) -> Self {
        let kind = match msg {
            Msg::Catalog { items } => IncomingKind::Catalog(items),
            Msg::ItemUpdated { item } => IncomingKind::ItemUpdated(item),
            other => IncomingKind::Other(other),
        };
        Self { stream, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_frames_are_unwrapped() {
        let msg: Msg = serde_json::from_str(
            r#"{"type":"Catalog","data":{"items":[{"id":"a","name":"A","popularity":7}]}}"#,
        )
        .expect("decode");
        let inc = Incoming::from_msg("s".into(), msg);
        match inc.kind {
            IncomingKind::Catalog(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].popularity, 7);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_messages_pass_through() {
        let inc = Incoming::from_msg("s".into(), Msg::Pong);
        assert!(matches!(inc.kind, IncomingKind::Other(Msg::Pong)));
    }
}
