use std::sync::Arc;

use adapters::InMemoryMessenger;
use application::ports::in_::Matchmaker;
use domain::{ConnectionId, PairingConfig, PairingEvent, RegistrySnapshot, Room};

fn setup() -> (Matchmaker, Arc<InMemoryMessenger>) {
    let messenger = Arc::new(InMemoryMessenger::new());
    let config = PairingConfig {
        waiting_message: "hold on".to_string(),
    };
    (Matchmaker::new(config, messenger.clone()), messenger)
}

#[tokio::test]
async fn three_joins_pair_two_and_queue_one() {
    let (matchmaker, messenger) = setup();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    for id in [a, b, c] {
        matchmaker.on_join(id).await.unwrap();
    }

    let room = Room::for_pair(a, b);
    assert_eq!(messenger.room_members(&room), Some(vec![a, b]));
    assert_eq!(
        messenger.events_for(a),
        vec![
            PairingEvent::Waiting("hold on".to_string()),
            PairingEvent::ConnectUsers { room: room.clone() },
        ]
    );
    assert_eq!(messenger.events_for(b), vec![PairingEvent::ConnectUsers { room }]);
    assert_eq!(messenger.events_for(c), vec![PairingEvent::Waiting("hold on".to_string())]);
}

#[tokio::test]
async fn survivor_is_rematched_with_the_waiter() {
    let (matchmaker, messenger) = setup();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    for id in [a, b, c] {
        matchmaker.on_join(id).await.unwrap();
    }
    messenger.close_connection(a);
    matchmaker.on_disconnect(a).await.unwrap();

    let old_room = Room::for_pair(a, b);
    let new_room = Room::for_pair(c, b);
    assert_eq!(messenger.room_members(&old_room), None);
    assert_eq!(messenger.room_members(&new_room), Some(vec![c, b]));
    assert_eq!(
        messenger.events_for(b),
        vec![
            PairingEvent::ConnectUsers { room: old_room.clone() },
            PairingEvent::PartnerLeft { room: old_room },
            PairingEvent::ConnectUsers { room: new_room.clone() },
        ]
    );
    assert_eq!(messenger.events_for(c).last(), Some(&PairingEvent::ConnectUsers { room: new_room }));
    assert_eq!(
        matchmaker.snapshot().await,
        RegistrySnapshot {
            connections: 2,
            waiting: 0,
            paired: 2,
        }
    );
}

#[tokio::test]
async fn closed_member_does_not_block_room_broadcast() {
    let (matchmaker, messenger) = setup();
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    matchmaker.on_join(a).await.unwrap();
    messenger.close_connection(a);
    matchmaker.on_join(b).await.unwrap();

    // `a` could not join the room, so only `b` hears about the pairing.
    let room = Room::for_pair(a, b);
    assert_eq!(messenger.events_for(b), vec![PairingEvent::ConnectUsers { room }]);
    assert_eq!(matchmaker.snapshot().await.paired, 2);
}
