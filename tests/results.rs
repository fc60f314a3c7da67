//! Integration tests for recording match results and aggregating competitor results.

use chrono::NaiveDate;
use dojo_tournament::logic::{
    generate_poule_matches, record_match_result, register_competitor, set_participation_status,
    standings, update_participation, ParticipationUpdate, ResultUpdate, WinnerUpdate,
};
use dojo_tournament::models::{Outcome, ParticipationStatus};
use dojo_tournament::{
    Category, CategoryId, Competitor, CompetitorId, EngineError, GameMatch, MatchStatus, Poule,
    Side, Store, Tournament, TournamentId,
};

struct Fixture {
    store: Store,
    tournament: TournamentId,
    category: CategoryId,
    competitors: Vec<CompetitorId>,
    matches: Vec<GameMatch>,
}

/// Poule of `n` registered competitors with its round robin generated.
fn poule_fixture(n: usize) -> Fixture {
    let mut store = Store::new();
    let date = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
    let tournament = store.tournaments.create(Tournament::new("Autumn Cup", date)).id;
    let category = store.categories.create(Category::new("-73kg")).id;
    let competitors: Vec<CompetitorId> = (0..n)
        .map(|i| {
            let id = store
                .competitors
                .create(Competitor::new(format!("K{i}"), "Test"))
                .id;
            register_competitor(&mut store, id, tournament, category).unwrap();
            id
        })
        .collect();
    let poule = store
        .poules
        .create(Poule::new("Poule 1", tournament, category, competitors.clone()))
        .id;
    let matches = generate_poule_matches(&mut store, poule).unwrap().matches;
    Fixture {
        store,
        tournament,
        category,
        competitors,
        matches,
    }
}

#[test]
fn partial_update_leaves_other_fields_alone() {
    let mut f = poule_fixture(2);
    let id = f.matches[0].id;
    let first = ResultUpdate {
        score1: Some(2),
        fouls2: Some(1),
        ..Default::default()
    };
    record_match_result(&mut f.store, id, &first).unwrap();
    let second = ResultUpdate {
        score2: Some(4),
        ..Default::default()
    };
    let recorded = record_match_result(&mut f.store, id, &second).unwrap().game;

    assert_eq!(recorded.score1, 2);
    assert_eq!(recorded.score2, 4);
    assert_eq!(recorded.fouls1, 0);
    assert_eq!(recorded.fouls2, 1);
    assert_eq!(recorded.winner, None);
    assert_eq!(recorded.status, MatchStatus::Pending);
    assert_eq!(recorded.end_time, None);
}

#[test]
fn setting_a_winner_completes_the_match() {
    let mut f = poule_fixture(2);
    let id = f.matches[0].id;
    let update = ResultUpdate {
        score1: Some(1),
        score2: Some(3),
        winner: WinnerUpdate::Set(Side::Two),
        ..Default::default()
    };
    let recorded = record_match_result(&mut f.store, id, &update).unwrap().game;
    assert_eq!(recorded.winner, Some(f.competitors[1]));
    assert_eq!(recorded.status, MatchStatus::Completed);
    assert!(recorded.end_time.is_some());
}

#[test]
fn clearing_the_winner_reopens_the_match() {
    let mut f = poule_fixture(2);
    let id = f.matches[0].id;
    let start = ResultUpdate {
        status: Some(MatchStatus::Ongoing),
        ..Default::default()
    };
    let started = record_match_result(&mut f.store, id, &start).unwrap().game;
    assert_eq!(started.status, MatchStatus::Ongoing);
    assert!(started.start_time.is_some());

    let win = ResultUpdate {
        winner: WinnerUpdate::Set(Side::One),
        ..Default::default()
    };
    record_match_result(&mut f.store, id, &win).unwrap();

    let clear = ResultUpdate {
        winner: WinnerUpdate::Clear,
        ..Default::default()
    };
    let reopened = record_match_result(&mut f.store, id, &clear).unwrap().game;
    assert_eq!(reopened.winner, None);
    assert_eq!(reopened.status, MatchStatus::Ongoing);
    assert_eq!(reopened.end_time, None);
    assert_eq!(reopened.start_time, started.start_time);
}

#[test]
fn completing_needs_a_winner() {
    let mut f = poule_fixture(2);
    let id = f.matches[0].id;
    let update = ResultUpdate {
        status: Some(MatchStatus::Completed),
        ..Default::default()
    };
    assert_eq!(
        record_match_result(&mut f.store, id, &update).unwrap_err(),
        EngineError::CompletedWithoutWinner(id)
    );
    assert_eq!(f.store.matches.get(id).unwrap().status, MatchStatus::Pending);
}

#[test]
fn unknown_match_is_not_found() {
    let mut f = poule_fixture(2);
    let err = record_match_result(&mut f.store, uuid::Uuid::new_v4(), &ResultUpdate::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[test]
fn winner_from_empty_slot_is_rejected() {
    let mut f = poule_fixture(2);
    let shell = GameMatch::bracket_shell(f.tournament, f.category, 2, 0);
    let id = f.store.matches.create(shell).id;
    let update = ResultUpdate {
        winner: WinnerUpdate::Set(Side::One),
        ..Default::default()
    };
    assert_eq!(
        record_match_result(&mut f.store, id, &update).unwrap_err(),
        EngineError::EmptySlot {
            match_id: id,
            side: Side::One
        }
    );
}

#[test]
fn results_are_aggregated_per_competitor() {
    let mut f = poule_fixture(3);
    // Pairs: (0,1), (0,2), (1,2).
    let results = [(5, 1, 0, 2, Side::One), (2, 3, 1, 0, Side::Two), (4, 0, 0, 0, Side::One)];
    for (m, (s1, s2, f1, f2, side)) in f.matches.clone().iter().zip(results) {
        let update = ResultUpdate {
            score1: Some(s1),
            score2: Some(s2),
            fouls1: Some(f1),
            fouls2: Some(f2),
            winner: WinnerUpdate::Set(side),
            ..Default::default()
        };
        record_match_result(&mut f.store, m.id, &update).unwrap();
    }

    let k0 = f.store.competitors.get(f.competitors[0]).unwrap();
    let entry = &k0.participation(f.tournament, f.category).unwrap().results;
    assert_eq!(entry.points, 7);
    assert_eq!(entry.faults, 1);
    assert_eq!(entry.status, ParticipationStatus::Active);
    assert_eq!(entry.matches.len(), 2);
    assert_eq!(entry.matches[0].outcome, Outcome::Win);
    assert_eq!(entry.matches[0].opponent, Some(f.competitors[1]));
    assert_eq!(entry.matches[1].outcome, Outcome::Loss);

    // Re-recording the same match replaces its history entry.
    let rescore = ResultUpdate {
        score1: Some(6),
        ..Default::default()
    };
    record_match_result(&mut f.store, f.matches[0].id, &rescore).unwrap();
    let k0 = f.store.competitors.get(f.competitors[0]).unwrap();
    let entry = &k0.participation(f.tournament, f.category).unwrap().results;
    assert_eq!(entry.matches.len(), 2);
    assert_eq!(entry.points, 8);

    let table = standings(&f.store, f.tournament, f.category);
    let order: Vec<CompetitorId> = table.iter().map(|s| s.competitor).collect();
    // K0: 8 points, K1: 1 + 4 = 5, K2: 3 + 0 = 3.
    assert_eq!(order, f.competitors);
}

#[test]
fn ranked_competitors_come_first() {
    let mut f = poule_fixture(3);
    let win = ResultUpdate {
        score1: Some(9),
        winner: WinnerUpdate::Set(Side::One),
        ..Default::default()
    };
    record_match_result(&mut f.store, f.matches[0].id, &win).unwrap();
    let ranked = ParticipationUpdate {
        rank: Some(1),
        status: Some(ParticipationStatus::Completed),
    };
    let updated =
        update_participation(&mut f.store, f.competitors[2], f.tournament, f.category, &ranked)
            .unwrap();
    let results = &updated.participation(f.tournament, f.category).unwrap().results;
    assert_eq!(results.rank, Some(1));
    assert_eq!(results.status, ParticipationStatus::Completed);

    let table = standings(&f.store, f.tournament, f.category);
    assert_eq!(table[0].competitor, f.competitors[2]);
    assert_eq!(table[1].competitor, f.competitors[0]);
    assert_eq!(table[1].points, 9);
    assert_eq!(table[0].status, ParticipationStatus::Completed);
}

#[test]
fn disqualification_sticks_through_later_results() {
    let mut f = poule_fixture(2);
    set_participation_status(
        &mut f.store,
        f.competitors[1],
        f.tournament,
        f.category,
        ParticipationStatus::Disqualified,
    )
    .unwrap();
    let win = ResultUpdate {
        winner: WinnerUpdate::Set(Side::One),
        ..Default::default()
    };
    record_match_result(&mut f.store, f.matches[0].id, &win).unwrap();

    let status = |store: &Store, id: CompetitorId| {
        store
            .competitors
            .get(id)
            .unwrap()
            .participation(f.tournament, f.category)
            .unwrap()
            .results
            .status
    };
    assert_eq!(status(&f.store, f.competitors[1]), ParticipationStatus::Disqualified);
    assert_eq!(status(&f.store, f.competitors[0]), ParticipationStatus::Active);
}

#[test]
fn participation_update_needs_a_registration() {
    let mut f = poule_fixture(2);
    let other_category = f.store.categories.create(Category::new("-90kg")).id;
    let err = set_participation_status(
        &mut f.store,
        f.competitors[0],
        f.tournament,
        other_category,
        ParticipationStatus::Completed,
    )
    .unwrap_err();
    assert_eq!(
        err,
        EngineError::NotRegistered {
            competitor: f.competitors[0],
            tournament: f.tournament
        }
    );
    assert!(matches!(
        update_participation(
            &mut f.store,
            uuid::Uuid::new_v4(),
            f.tournament,
            f.category,
            &ParticipationUpdate::default()
        ),
        Err(EngineError::NotFound { .. })
    ));
}

#[test]
fn winner_field_is_tri_state() {
    let parse = |json: &str| serde_json::from_str::<ResultUpdate>(json).map(|u| u.winner);
    assert_eq!(parse("{}").unwrap(), WinnerUpdate::Keep);
    assert_eq!(parse(r#"{"winner": null}"#).unwrap(), WinnerUpdate::Clear);
    assert_eq!(parse(r#"{"winner": ""}"#).unwrap(), WinnerUpdate::Clear);
    assert_eq!(parse(r#"{"winner": "1"}"#).unwrap(), WinnerUpdate::Set(Side::One));
    assert_eq!(parse(r#"{"winner": 2}"#).unwrap(), WinnerUpdate::Set(Side::Two));
    assert!(parse(r#"{"winner": "3"}"#).is_err());
}
