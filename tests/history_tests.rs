use std::collections::HashSet;

use voice_relay::audio::AudioArtifact;
use voice_relay::history::{Direction, MessageEntry, MessageHistory};

#[test]
fn append_preserves_insertion_order() {
    let mut history = MessageHistory::new();

    let e1 = MessageEntry::sent(AudioArtifact::new("a.wav"));
    let e2 = MessageEntry::received(AudioArtifact::new("b.wav"));
    let e3 = MessageEntry::sent(AudioArtifact::new("c.wav"));
    let expected = vec![e1.id, e2.id, e3.id];

    history.append(e1);
    history.append(e2);
    history.append(e3);

    let actual: Vec<_> = history.entries().iter().map(|e| e.id).collect();
    assert_eq!(actual, expected);
}

#[test]
fn entry_ids_are_unique() {
    let mut history = MessageHistory::new();
    for i in 0..100 {
        history.append(MessageEntry::sent(AudioArtifact::new(format!("{}.wav", i))));
    }

    let ids: HashSet<_> = history.entries().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn last_sent_skips_received_entries() {
    let mut history = MessageHistory::new();
    assert!(history.last_sent().is_none());

    history.append(MessageEntry::sent(AudioArtifact::new("first.wav")));
    history.append(MessageEntry::sent(AudioArtifact::new("second.wav")));
    history.append(MessageEntry::received(AudioArtifact::new("converted.wav")));

    let last = history.last_sent().unwrap();
    assert_eq!(last.direction, Direction::Sent);
    assert_eq!(last.artifact.locator, "second.wav");
}

#[test]
fn entries_carry_direction_and_timestamp() {
    let sent = MessageEntry::sent(AudioArtifact::new("s.wav"));
    let received = MessageEntry::received(AudioArtifact::new("r.wav"));

    assert_eq!(sent.direction, Direction::Sent);
    assert_eq!(received.direction, Direction::Received);
    assert!(received.created_at >= sent.created_at);
}

#[test]
fn entry_serialization_uses_snake_case_directions() {
    let entry = MessageEntry::received(AudioArtifact::with_size("r.wav", 4));

    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"received\""));
    assert!(json.contains("r.wav"));

    let decoded: MessageEntry = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.id, entry.id);
    assert_eq!(decoded.direction, Direction::Received);
    assert_eq!(decoded.artifact.size_hint, Some(4));
}
