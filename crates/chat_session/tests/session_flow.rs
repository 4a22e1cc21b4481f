mod support;

use chat_session::protocol::{AgentConfig, ChatOutcome, Message};
use chat_session::{
    ChatSession, Mode, SessionSnapshot, TRANSPORT_FAILURE_TEXT, VALIDITY_FAILURE_TEXT,
};
use pretty_assertions::assert_eq;
use support::{lock_unpoisoned, recording_listener, HostSpy};

fn missing_response() -> ChatOutcome {
    ChatOutcome::MissingResponse {
        backend_error: None,
    }
}

#[test]
fn update_input_only_touches_pending_input() {
    let mut session = ChatSession::default();

    session.update_input("draft");

    assert_eq!(session.pending_input(), "draft");
    assert!(session.transcript().is_empty());
    assert_eq!(session.mode(), Mode::Idle);
}

#[test]
fn accepted_submit_appends_user_message_and_enters_flight() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("hello");
    let request_id = session.submit(&mut host).expect("submit accepted");

    assert_eq!(session.transcript(), &[Message::user("hello")]);
    assert_eq!(session.pending_input(), "");
    assert_eq!(session.mode(), Mode::InFlight { request_id });
    assert_eq!(host.started.len(), 1);

    let (started_id, request) = &host.started[0];
    assert_eq!(*started_id, request_id);
    assert_eq!(request.message, "hello");
    assert_eq!(request.agent_config, AgentConfig::web_search_agent());
    assert!(request.history.is_empty());
}

#[test]
fn reply_scenario_appends_agent_text() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("hello");
    let request_id = session.submit(&mut host).expect("submit accepted");
    assert!(session.on_reply(request_id, ChatOutcome::Reply("hi there".to_string())));

    assert_eq!(
        session.transcript(),
        &[Message::user("hello"), Message::assistant("hi there")]
    );
    assert!(!session.is_in_flight());
}

#[test]
fn missing_response_scenario_appends_validity_fallback() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("hello");
    let request_id = session.submit(&mut host).expect("submit accepted");
    session.on_reply(request_id, missing_response());

    assert_eq!(
        session.transcript(),
        &[
            Message::user("hello"),
            Message::assistant("Sorry, something went wrong.")
        ]
    );
    assert!(!session.is_in_flight());
}

#[test]
fn transport_failure_scenario_appends_connection_fallback() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("hello");
    let request_id = session.submit(&mut host).expect("submit accepted");
    session.on_reply(
        request_id,
        ChatOutcome::TransportFailed {
            error: "connection refused".to_string(),
        },
    );

    assert_eq!(
        session.transcript(),
        &[
            Message::user("hello"),
            Message::assistant("Failed to connect to the backend.")
        ]
    );
    assert!(!session.is_in_flight());
}

#[test]
fn blank_input_is_a_silent_no_op() {
    for blank in ["", "   ", "\n\t "] {
        let mut session = ChatSession::default();
        let mut host = HostSpy::default();

        session.update_input(blank);
        assert_eq!(session.submit(&mut host), None);

        assert!(session.transcript().is_empty());
        assert_eq!(session.pending_input(), blank);
        assert!(host.started.is_empty());
        assert_eq!(session.mode(), Mode::Idle);
    }
}

#[test]
fn submit_while_in_flight_is_ignored_until_resolution() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("a");
    let first = session.submit(&mut host).expect("first submit accepted");

    session.update_input("b");
    assert_eq!(session.submit(&mut host), None);
    assert_eq!(session.pending_input(), "b");
    assert_eq!(session.transcript(), &[Message::user("a")]);
    assert_eq!(host.messages(), vec!["a".to_string()]);

    session.on_reply(first, ChatOutcome::Reply("for a".to_string()));

    assert_eq!(
        session.transcript(),
        &[Message::user("a"), Message::assistant("for a")]
    );
    assert_eq!(session.pending_input(), "b");
    assert!(!session.is_in_flight());
}

#[test]
fn message_content_is_sent_untrimmed() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("  padded question \n");
    session.submit(&mut host).expect("submit accepted");

    assert_eq!(host.started[0].1.message, "  padded question \n");
    assert_eq!(
        session.transcript(),
        &[Message::user("  padded question \n")]
    );
}

#[test]
fn history_holds_only_messages_before_the_new_one() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("first");
    let first = session.submit(&mut host).expect("first");
    session.on_reply(first, ChatOutcome::Reply("one".to_string()));

    session.update_input("second");
    let second = session.submit(&mut host).expect("second");
    session.on_reply(second, missing_response());

    session.update_input("third");
    session.submit(&mut host).expect("third");

    let (_, third_request) = host.started.last().expect("third request issued");
    assert_eq!(third_request.message, "third");
    assert_eq!(
        third_request.history,
        vec![
            Message::user("first"),
            Message::assistant("one"),
            Message::user("second"),
            Message::assistant(VALIDITY_FAILURE_TEXT),
        ]
    );
}

#[test]
fn transcript_grows_by_two_per_cycle_on_every_outcome() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();
    let outcomes = [
        ChatOutcome::Reply("ok".to_string()),
        missing_response(),
        ChatOutcome::TransportFailed {
            error: "timeout".to_string(),
        },
        ChatOutcome::MissingResponse {
            backend_error: Some("model error".to_string()),
        },
    ];

    for (cycle, outcome) in outcomes.into_iter().enumerate() {
        assert!(!session.is_in_flight());
        session.update_input(format!("prompt {cycle}"));
        let request_id = session.submit(&mut host).expect("submit accepted");
        session.on_reply(request_id, outcome);

        assert_eq!(session.transcript().len(), 2 * (cycle + 1));
        assert!(!session.is_in_flight());
    }
}

#[test]
fn sequential_cycles_keep_submission_order() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();

    session.update_input("A");
    let a = session.submit(&mut host).expect("A");
    session.on_reply(a, ChatOutcome::Reply("reply A".to_string()));

    session.update_input("B");
    let b = session.submit(&mut host).expect("B");
    session.on_reply(
        b,
        ChatOutcome::TransportFailed {
            error: "reset".to_string(),
        },
    );

    assert_eq!(
        session.transcript(),
        &[
            Message::user("A"),
            Message::assistant("reply A"),
            Message::user("B"),
            Message::assistant(TRANSPORT_FAILURE_TEXT),
        ]
    );
}

#[test]
fn host_start_failure_resolves_as_transport_failure() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::failing("Failed to spawn request worker");

    session.update_input("hello");
    let request_id = session.submit(&mut host);

    assert!(request_id.is_some());
    assert_eq!(
        session.transcript(),
        &[
            Message::user("hello"),
            Message::assistant(TRANSPORT_FAILURE_TEXT)
        ]
    );
    assert_eq!(session.pending_input(), "");
    assert!(!session.is_in_flight());
}

#[test]
fn listeners_observe_each_mutation_but_not_rejected_submits() {
    let mut session = ChatSession::default();
    let mut host = HostSpy::default();
    let (listener, seen) = recording_listener();
    session.subscribe(listener);

    session.update_input("   ");
    assert_eq!(session.submit(&mut host), None);
    session.update_input("hello");
    let request_id = session.submit(&mut host).expect("submit accepted");
    assert_eq!(session.submit(&mut host), None);
    session.on_reply(request_id, ChatOutcome::Reply("hi there".to_string()));

    let seen = lock_unpoisoned(&seen).clone();
    assert_eq!(
        seen,
        vec![
            SessionSnapshot {
                transcript: vec![],
                pending_input: "   ".to_string(),
                in_flight: false,
            },
            SessionSnapshot {
                transcript: vec![],
                pending_input: "hello".to_string(),
                in_flight: false,
            },
            SessionSnapshot {
                transcript: vec![Message::user("hello")],
                pending_input: String::new(),
                in_flight: true,
            },
            SessionSnapshot {
                transcript: vec![Message::user("hello"), Message::assistant("hi there")],
                pending_input: String::new(),
                in_flight: false,
            },
        ]
    );
}

#[test]
fn custom_agent_config_is_sent_unchanged() {
    let config = AgentConfig::new("Scribe", "Summarize tersely.", ["notes", "web_search"]);
    let mut session = ChatSession::new(config.clone());
    let mut host = HostSpy::default();

    session.update_input("go");
    session.submit(&mut host).expect("submit accepted");

    assert_eq!(host.started[0].1.agent_config, config);
    assert_eq!(session.config(), &config);
}
