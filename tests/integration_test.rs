use chrono::{Duration, Utc};
use feud::error::GameError;
use feud::protocol::{ClientMessage, ServerMessage};
use feud::questions::QuestionBank;
use feud::state::AppState;
use feud::types::{FastMoneyStatus, Game, GameConfig, GamePhase, PlayChoice, TeamId};
use feud::ws::handlers::handle_message;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

struct Client {
    id: String,
    rx: UnboundedReceiver<ServerMessage>,
}

impl Client {
    async fn connect(state: &Arc<AppState>) -> Self {
        let (id, rx) = state.connect().await;
        Self { id, rx }
    }

    async fn send(&self, state: &Arc<AppState>, msg: ClientMessage) -> Option<ServerMessage> {
        handle_message(msg, &self.id, state).await
    }

    fn drain(&mut self) -> Vec<ServerMessage> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            out.push(msg);
        }
        out
    }

    /// Most recent snapshot received since the last drain
    fn latest(&mut self) -> Option<Game> {
        self.drain().into_iter().rev().find_map(|msg| match msg {
            ServerMessage::State { state, .. } => Some(*state),
            _ => None,
        })
    }
}

fn text(s: &str) -> String {
    s.to_string()
}

/// Room with a host, Alice on team A and Bob on team B
async fn setup(state: &Arc<AppState>) -> (Client, Client, Client, String) {
    let host = Client::connect(state).await;
    let code = match host.send(state, ClientMessage::Create).await {
        Some(ServerMessage::Created { code }) => code,
        other => panic!("Expected Created message, got {:?}", other),
    };

    let alice = Client::connect(state).await;
    let bob = Client::connect(state).await;
    for (client, name) in [(&alice, "Alice"), (&bob, "Bob")] {
        let reply = client
            .send(
                state,
                ClientMessage::Join {
                    code: code.clone(),
                    name: Some(name.to_string()),
                },
            )
            .await;
        assert_eq!(reply, Some(ServerMessage::Joined { code: code.clone() }));
    }

    (host, alice, bob, code)
}

async fn start_round(state: &Arc<AppState>, host: &Client, question_index: usize) {
    let reply = host
        .send(
            state,
            ClientMessage::StartRound {
                question_index,
                duration: None,
            },
        )
        .await;
    assert!(reply.is_none());
}

/// Face-off, play/pass, answers, strikes and a successful steal
#[tokio::test]
async fn test_round_with_steal() {
    let state = Arc::new(AppState::new());
    let (mut host, alice, mut bob, code) = setup(&state).await;

    let game = host.latest().expect("host should see joins");
    assert_eq!(game.players.len(), 2);
    assert_eq!(game.player(&alice.id).unwrap().team, TeamId::TeamA);
    assert_eq!(game.player(&bob.id).unwrap().team, TeamId::TeamB);

    start_round(&state, &host, 0).await;
    let game = bob.latest().unwrap();
    assert_eq!(game.phase, GamePhase::FaceOff);
    assert_eq!(game.current_round, 1);
    assert_eq!(game.point_multiplier, 1);

    // Alice finds #2, Bob beats it with #1
    alice
        .send(&state, ClientMessage::BuzzIn { text: text("Mushroom") })
        .await;
    let reply = alice
        .send(&state, ClientMessage::BuzzIn { text: text("onions") })
        .await;
    assert_eq!(reply, Some(ServerMessage::from(&GameError::AlreadyBuzzed)));

    bob.send(&state, ClientMessage::BuzzIn { text: text("pepperoni") })
        .await;
    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::PlayOrPass);
    assert_eq!(game.face_off_winner.as_ref().unwrap().id, bob.id);
    assert_eq!(game.face_off_buzzers[0].rank, Some(2));
    assert_eq!(game.face_off_buzzers[1].rank, Some(1));
    assert!(game.revealed_answers.is_empty());

    host.send(
        &state,
        ClientMessage::ChoosePlayPass {
            choice: PlayChoice::Pass,
        },
    )
    .await;
    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::RoundPlay);
    assert_eq!(game.controlling_team, Some(TeamId::TeamA));
    assert!(game.round_ends_at.is_some());

    alice
        .send(&state, ClientMessage::Answer { text: text("onion") })
        .await;
    for miss in ["qq", "yy", "zz"] {
        alice
            .send(&state, ClientMessage::Answer { text: text(miss) })
            .await;
    }

    let game = bob.latest().unwrap();
    assert_eq!(game.teams.team_a.score, 14);
    assert_eq!(game.teams.team_a.strikes, 3);
    assert_eq!(game.phase, GamePhase::TeamSteal);
    assert_eq!(game.stealing_team, Some(TeamId::TeamB));
    assert!(game.round_ends_at.is_none());

    bob.send(&state, ClientMessage::StealAttempt { text: text("sausage") })
        .await;
    let game = state.get_game(&code).await.unwrap();
    assert_eq!(game.phase, GamePhase::RoundEnd);
    assert_eq!(game.teams.team_b.score, 12);
    assert_eq!(game.steal_answer.as_deref(), Some("sausage"));
    assert_eq!(game.revealed_answers.len(), 2);

    // Only one steal per round
    bob.drain();
    bob.send(&state, ClientMessage::StealAttempt { text: text("bacon") })
        .await;
    assert!(bob.drain().is_empty());
    assert_eq!(state.get_game(&code).await.unwrap().teams.team_b.score, 12);
}

/// Rejected actions never reach other clients
#[tokio::test]
async fn test_unauthorized_and_out_of_phase_actions() {
    let state = Arc::new(AppState::new());
    let (host, alice, mut bob, code) = setup(&state).await;
    bob.drain();

    // Player sending host commands
    let reply = alice
        .send(
            &state,
            ClientMessage::StartRound {
                question_index: 0,
                duration: None,
            },
        )
        .await;
    assert!(reply.is_none());
    alice.send(&state, ClientMessage::Reset).await;

    // Answers outside round play
    alice
        .send(&state, ClientMessage::Answer { text: text("pizza") })
        .await;
    host.send(&state, ClientMessage::FinishRound).await;

    assert!(bob.drain().is_empty());
    assert_eq!(state.get_game(&code).await.unwrap().phase, GamePhase::Lobby);

    // Host is not a player and cannot buzz
    start_round(&state, &host, 1).await;
    host.send(&state, ClientMessage::BuzzIn { text: text("tent") })
        .await;
    let game = state.get_game(&code).await.unwrap();
    assert_eq!(game.phase, GamePhase::FaceOff);
    assert!(game.face_off_buzzers.is_empty());
}

/// Threshold win, fast money with both contestants and a reset
#[tokio::test]
async fn test_win_then_fast_money() {
    let config = GameConfig {
        winning_score: 30,
        ..GameConfig::default()
    };
    let state = Arc::new(AppState::with_bank(QuestionBank::default(), config));
    let (mut host, alice, bob, code) = setup(&state).await;

    start_round(&state, &host, 0).await;
    alice
        .send(&state, ClientMessage::BuzzIn { text: text("pepperoni") })
        .await;
    host.send(
        &state,
        ClientMessage::ChoosePlayPass {
            choice: PlayChoice::Play,
        },
    )
    .await;
    alice
        .send(&state, ClientMessage::Answer { text: text("Pepperoni") })
        .await;
    host.send(&state, ClientMessage::FinishRound).await;

    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::GameOver);
    assert_eq!(game.winning_team, Some(TeamId::TeamA));
    assert_eq!(game.teams.team_a.score, 35);

    host.send(
        &state,
        ClientMessage::StartFastMoney {
            players: Some([alice.id.clone(), bob.id.clone()]),
        },
    )
    .await;
    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::FastMoneyP1);
    assert_eq!(game.fast_money.as_ref().unwrap().questions.len(), 5);

    for answer in ["friday", "watermelon"] {
        host.send(
            &state,
            ClientMessage::FastMoneyAnswer {
                text: text(answer),
                question_index: None,
            },
        )
        .await;
    }
    host.send(&state, ClientMessage::FinishFastMoneyP1).await;
    host.send(
        &state,
        ClientMessage::FastMoneyAnswer {
            text: text("Friday"),
            question_index: Some(0),
        },
    )
    .await;
    host.send(
        &state,
        ClientMessage::FastMoneyAnswer {
            text: text("strawberry"),
            question_index: Some(1),
        },
    )
    .await;

    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::FastMoneyP2);
    let fm = game.fast_money.as_ref().unwrap();
    assert_eq!(fm.p1_score, 97);
    assert_eq!(
        fm.p2_answers[0].as_ref().unwrap().status,
        FastMoneyStatus::Duplicate
    );
    assert_eq!(fm.p2_score, 22);
    assert_eq!(fm.total(), 119);

    // Player 2 runs out of time
    let expired = state
        .expire_deadlines(Utc::now() + Duration::seconds(60))
        .await;
    assert_eq!(expired, 1);
    let game = host.latest().unwrap();
    assert_eq!(game.phase, GamePhase::GameOver);
    assert_eq!(game.message, "Fast money over: 119 points!");

    host.send(&state, ClientMessage::Reset).await;
    let game = state.get_game(&code).await.unwrap();
    assert_eq!(game.phase, GamePhase::Lobby);
    assert_eq!(game.code, code);
    assert_eq!(game.host_id, host.id);
    assert_eq!(game.players.len(), 2);
    assert_eq!(game.teams.team_a.score, 35);
    assert_eq!(game.current_round, 0);
    assert!(game.fast_money.is_none());
}

/// Round play timer closes the round through the background sweep
#[tokio::test]
async fn test_round_play_times_out() {
    let state = Arc::new(AppState::new());
    let (host, alice, mut bob, code) = setup(&state).await;

    start_round(&state, &host, 2).await;
    bob.send(&state, ClientMessage::BuzzIn { text: text("traffic") })
        .await;
    host.send(
        &state,
        ClientMessage::ChoosePlayPass {
            choice: PlayChoice::Play,
        },
    )
    .await;
    alice
        .send(&state, ClientMessage::Answer { text: text("overslept") })
        .await;
    bob.drain();

    assert_eq!(state.expire_deadlines(Utc::now()).await, 0);
    let expired = state
        .expire_deadlines(Utc::now() + Duration::seconds(46))
        .await;
    assert_eq!(expired, 1);

    let game = bob.latest().unwrap();
    assert_eq!(game.code, code);
    assert_eq!(game.phase, GamePhase::RoundEnd);
    assert_eq!(game.message, "Time up!");
    assert!(game.round_ends_at.is_none());
    // Any roster player may answer during round play
    assert_eq!(game.teams.team_a.score, 28);
}

/// Leaving players free their slot; the team keeps its points
#[tokio::test]
async fn test_disconnect_mid_game() {
    let state = Arc::new(AppState::new());
    let (mut host, alice, bob, code) = setup(&state).await;

    start_round(&state, &host, 0).await;
    alice
        .send(&state, ClientMessage::BuzzIn { text: text("pepperoni") })
        .await;
    host.send(
        &state,
        ClientMessage::ChoosePlayPass {
            choice: PlayChoice::Play,
        },
    )
    .await;
    alice
        .send(&state, ClientMessage::Answer { text: text("pepperoni") })
        .await;
    host.drain();

    state.disconnect(&alice.id).await;

    let game = host.latest().expect("host should see the departure");
    assert_eq!(game.players.len(), 1);
    assert_eq!(game.players[0].id, bob.id);
    assert_eq!(game.teams.team_a.score, 35);

    // The next joiner fills the emptier team
    let carol = Client::connect(&state).await;
    carol
        .send(
            &state,
            ClientMessage::Join {
                code: code.to_lowercase(),
                name: None,
            },
        )
        .await;
    let game = state.get_game(&code).await.unwrap();
    let carol_player = game.player(&carol.id).unwrap();
    assert_eq!(carol_player.team, TeamId::TeamA);
    assert!(!carol_player.name.is_empty());
}

#[tokio::test]
async fn test_malformed_messages() {
    for raw in [
        "not json",
        r#"{"type":"award-points","points":500}"#,
        r#"{"type":"buzz-in"}"#,
    ] {
        let err = serde_json::from_str::<ClientMessage>(raw).unwrap_err();
        match ServerMessage::from(&GameError::Parse(err.to_string())) {
            ServerMessage::Error { code, message } => {
                assert_eq!(code, "PARSE_ERROR");
                assert!(message.starts_with("Invalid message format"));
            }
            other => panic!("Expected Error message, got {:?}", other),
        }
    }
}
