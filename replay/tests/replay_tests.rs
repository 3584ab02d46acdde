use dandelion_replay::{Action, Replay, ReplayConfig, ReplayError, Scenario, Step};
use dandelion_types::{Address, TokenAmount};
use dandelion_voting::{Capability, VoteStatus, VotingEvent};
use std::io::Write;

const DEMO_CONFIG: &str = include_str!("../demos/config.toml");
const DEMO_SCENARIO: &str = include_str!("../demos/scenario.json");

const HOLDER_20: Address = Address::from_low_u64(0x20);
const HOLDER_29: Address = Address::from_low_u64(0x29);
const HOLDER_51: Address = Address::from_low_u64(0x51);

fn demo_replay() -> Replay {
    let config = ReplayConfig::from_toml_str(DEMO_CONFIG).unwrap();
    Replay::from_config(&config).unwrap()
}

fn step(block: u64, action: Action) -> Step {
    Step { block, action }
}

#[test]
fn demo_scenario_enacts_the_vote() {
    let scenario = Scenario::from_json_str(DEMO_SCENARIO).unwrap();
    let report = demo_replay().run(&scenario);

    let ok: Vec<bool> = report.steps.iter().map(|s| s.ok).collect();
    assert_eq!(ok, vec![true, true, true, true, false, true, true]);
    assert_eq!(report.final_block, 711);

    let vote = &report.votes[0];
    assert_eq!(vote.start_block, 10);
    assert_eq!(vote.snapshot_block, 9);
    assert_eq!(vote.end_block, 510);
    assert_eq!(vote.execution_block, 710);
    assert_eq!(vote.yea, TokenAmount::new(51));
    assert_eq!(vote.nay, TokenAmount::new(29));
    assert_eq!(vote.voting_power, TokenAmount::new(100));
    assert_eq!(vote.voters, 2);
    assert!(vote.executed);
    assert_eq!(vote.status, VoteStatus::Enacted);
    assert_eq!(report.actions_logged, 1);
}

#[test]
fn demo_scenario_reports_dissent_window() {
    let scenario = Scenario::from_json_str(DEMO_SCENARIO).unwrap();
    let report = demo_replay().run(&scenario);

    let allowed: Vec<Option<bool>> = report
        .steps
        .iter()
        .filter(|s| s.action == "can_perform")
        .map(|s| s.result.as_ref().and_then(|r| r["allowed"].as_bool()))
        .collect();
    assert_eq!(allowed, vec![Some(false), Some(true), Some(true)]);
}

#[test]
fn demo_scenario_collects_events() {
    let scenario = Scenario::from_json_str(DEMO_SCENARIO).unwrap();
    let report = demo_replay().run(&scenario);

    let names: Vec<&str> = report.voting_events.iter().map(|e| e.name()).collect();
    assert_eq!(names, vec!["StartVote", "CastVote", "CastVote", "ExecuteVote"]);
    assert!(matches!(
        report.voting_events[1],
        VotingEvent::CastVote {
            supports: true,
            stake,
            ..
        } if stake == TokenAmount::new(51)
    ));
    assert!(report.dissent_events.is_empty());
}

#[test]
fn early_execution_is_reported_not_fatal() {
    let scenario = Scenario::from_json_str(DEMO_SCENARIO).unwrap();
    let report = demo_replay().run(&scenario);

    let early = &report.steps[4];
    assert_eq!(early.action, "execute");
    assert!(!early.ok);
    assert!(early.error.is_some());
    assert!(early.result.is_none());
}

#[test]
fn steps_cannot_go_back_in_time() {
    let mut replay = demo_replay();
    let mint = |block| {
        step(
            block,
            Action::Mint {
                holder: HOLDER_20,
                amount: 1,
            },
        )
    };
    assert!(replay.run_step(0, &mint(50)).ok);
    let outcome = replay.run_step(1, &mint(49));
    assert!(!outcome.ok);
    assert!(outcome
        .error
        .as_deref()
        .is_some_and(|e| e.contains("goes back in time")));
    assert!(replay.run_step(2, &mint(50)).ok);
}

#[test]
fn creating_without_capability_fails() {
    let mut config = ReplayConfig::from_toml_str(DEMO_CONFIG).unwrap();
    config.grant_all = false;
    let mut replay = Replay::from_config(&config).unwrap();

    let outcome = replay.run_step(
        0,
        &step(
            10,
            Action::NewVote {
                sender: HOLDER_51,
                script: None,
                metadata: String::new(),
                cast_vote: false,
            },
        ),
    );
    assert!(!outcome.ok);
    assert!(replay.report().votes.is_empty());
}

#[test]
fn explicit_grants_are_scoped_to_their_app() {
    let mut config = ReplayConfig::from_toml_str(DEMO_CONFIG).unwrap();
    config.grant_all = false;
    config.grants = vec![
        dandelion_replay::config::Grant {
            grantee: HOLDER_51,
            capability: Capability::CreateVotes,
        },
        dandelion_replay::config::Grant {
            grantee: HOLDER_29,
            capability: Capability::ModifyDissentConfig,
        },
    ];
    let mut replay = Replay::from_config(&config).unwrap();

    let created = replay
        .run_step(
            0,
            &step(
                10,
                Action::NewVote {
                    sender: HOLDER_51,
                    script: None,
                    metadata: "signal".into(),
                    cast_vote: true,
                },
            ),
        )
        .ok;
    assert!(created);

    let window = replay
        .run_step(
            1,
            &step(
                11,
                Action::SetDissentWindow {
                    sender: HOLDER_29,
                    blocks: 5,
                },
            ),
        )
        .ok;
    assert!(window);

    let support = replay
        .run_step(
            2,
            &step(
                12,
                Action::ChangeSupportRequired {
                    sender: HOLDER_51,
                    percent: 60,
                },
            ),
        )
        .ok;
    assert!(!support);

    let report = replay.report();
    assert_eq!(report.dissent_events.len(), 1);
    assert_eq!(report.votes[0].status, VoteStatus::Ongoing);
}

#[test]
fn malformed_script_fails_at_execution() {
    let mut replay = demo_replay();
    let create = replay
        .run_step(
            0,
            &step(
                10,
                Action::NewVote {
                    sender: HOLDER_51,
                    script: Some("0x00000001ffff".into()),
                    metadata: String::new(),
                    cast_vote: true,
                },
            ),
        )
        .clone();
    assert!(create.ok);

    let execute = replay.run_step(1, &step(710, Action::Execute { vote_id: 0 }));
    assert!(!execute.ok);
    assert!(!replay.report().votes[0].executed);
}

#[test]
fn non_hex_script_is_rejected_up_front() {
    let mut replay = demo_replay();
    let outcome = replay.run_step(
        0,
        &step(
            10,
            Action::Forward {
                sender: HOLDER_51,
                script: "0xnothex".into(),
            },
        ),
    );
    assert!(!outcome.ok);
    assert!(replay.report().votes.is_empty());
}

#[test]
fn token_moves_after_snapshot_do_not_count() {
    let mut replay = demo_replay();
    let steps = vec![
        step(
            10,
            Action::NewVote {
                sender: HOLDER_20,
                script: None,
                metadata: String::new(),
                cast_vote: false,
            },
        ),
        step(
            11,
            Action::Transfer {
                from: HOLDER_51,
                to: HOLDER_20,
                amount: 51,
            },
        ),
        step(
            12,
            Action::Vote {
                sender: HOLDER_20,
                vote_id: 0,
                supports: true,
            },
        ),
        step(
            13,
            Action::Vote {
                sender: HOLDER_51,
                vote_id: 0,
                supports: true,
            },
        ),
    ];
    let report = replay.run(&Scenario { steps });
    let ok: Vec<bool> = report.steps.iter().map(|s| s.ok).collect();
    assert_eq!(ok, vec![true, true, true, false]);
    assert_eq!(report.votes[0].yea, TokenAmount::new(20));
}

#[test]
fn scenario_and_report_go_through_files() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DEMO_SCENARIO.as_bytes()).unwrap();
    let scenario = Scenario::from_json_file(file.path()).unwrap();

    let report = demo_replay().run(&scenario);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["final_block"], 711);
    assert_eq!(json["votes"][0]["creator"], HOLDER_51.to_string());
    assert_eq!(json["votes"][0]["status"], "Enacted");
    assert!(json["steps"][0].get("error").is_none());

    assert!(matches!(
        Scenario::from_json_file("/nonexistent/scenario.json"),
        Err(ReplayError::Scenario(_))
    ));
}
