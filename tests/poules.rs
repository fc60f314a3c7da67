//! Integration tests for poules: draw, round-robin generation and completion.

use chrono::NaiveDate;
use dojo_tournament::logic::{
    check_poule_completion, delete_match, generate_poule_matches, generate_poules,
    record_match_result, register_competitor, GeneratePoules, ResultUpdate, WinnerUpdate,
};
use dojo_tournament::{
    Category, CategoryId, Competitor, CompetitorId, EngineError, MatchKind, MatchStatus, Poule,
    PouleStatus, Side, Store, Tournament, TournamentId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn setup(n: usize) -> (Store, TournamentId, CategoryId, Vec<CompetitorId>) {
    let mut store = Store::new();
    let date = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();
    let tournament = store.tournaments.create(Tournament::new("Club Cup", date)).id;
    let category = store.categories.create(Category::new("Juniors")).id;
    let competitors = (0..n)
        .map(|i| {
            let id = store
                .competitors
                .create(Competitor::new(format!("P{i}"), "Test"))
                .id;
            register_competitor(&mut store, id, tournament, category).unwrap();
            id
        })
        .collect();
    (store, tournament, category, competitors)
}

fn request(t: TournamentId, c: CategoryId, count: u32, competitors: &[CompetitorId]) -> GeneratePoules {
    GeneratePoules {
        tournament: t,
        category: c,
        poules_requested: count,
        competitors: competitors.to_vec(),
        replace_existing: false,
    }
}

/// A single poule holding `competitors` in the given order.
fn single_poule(store: &mut Store, t: TournamentId, c: CategoryId, competitors: &[CompetitorId]) -> Poule {
    store
        .poules
        .create(Poule::new("Poule 1", t, c, competitors.to_vec()))
        .clone()
}

#[test]
fn poules_are_cut_into_equal_chunks() {
    let (mut store, t, c, competitors) = setup(10);
    let mut rng = StdRng::seed_from_u64(1);
    let generation = generate_poules(&mut store, &request(t, c, 3, &competitors), &mut rng).unwrap();

    assert_eq!(generation.total_competitors, 10);
    assert_eq!(generation.competitors_per_poule, 4);
    assert_eq!(generation.poules_created, 3);
    let sizes: Vec<usize> = generation.poules.iter().map(|p| p.competitors.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    let names: Vec<&str> = generation.poules.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Poule 1", "Poule 2", "Poule 3"]);
    assert!(generation.poules.iter().all(|p| p.status == PouleStatus::Pending));

    let drawn: HashSet<CompetitorId> = generation
        .poules
        .iter()
        .flat_map(|p| p.competitors.iter().copied())
        .collect();
    assert_eq!(drawn.len(), 10);
    assert_eq!(drawn, competitors.into_iter().collect::<HashSet<_>>());
}

#[test]
fn requested_count_is_an_upper_bound() {
    let (mut store, t, c, competitors) = setup(5);
    let mut rng = StdRng::seed_from_u64(4);
    let generation = generate_poules(&mut store, &request(t, c, 4, &competitors), &mut rng).unwrap();
    assert_eq!(generation.competitors_per_poule, 2);
    assert_eq!(generation.poules_created, 3);
    assert_eq!(store.poules.len(), 3);
}

#[test]
fn poule_generation_validates_input() {
    let (mut store, t, c, competitors) = setup(4);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(
        generate_poules(&mut store, &request(t, c, 0, &competitors), &mut rng).unwrap_err(),
        EngineError::InvalidPouleCount
    );
    assert_eq!(
        generate_poules(&mut store, &request(t, c, 2, &[]), &mut rng).unwrap_err(),
        EngineError::NoCompetitors
    );
    let unknown = uuid::Uuid::new_v4();
    assert!(matches!(
        generate_poules(&mut store, &request(t, unknown, 2, &competitors), &mut rng),
        Err(EngineError::NotFound { .. })
    ));
}

#[test]
fn existing_poules_need_replace_flag() {
    let (mut store, t, c, competitors) = setup(6);
    let mut rng = StdRng::seed_from_u64(8);
    let first = generate_poules(&mut store, &request(t, c, 2, &competitors), &mut rng).unwrap();
    generate_poule_matches(&mut store, first.poules[0].id).unwrap();

    assert_eq!(
        generate_poules(&mut store, &request(t, c, 3, &competitors), &mut rng).unwrap_err(),
        EngineError::PoulesExist
    );

    let replace = GeneratePoules {
        replace_existing: true,
        ..request(t, c, 3, &competitors)
    };
    let second = generate_poules(&mut store, &replace, &mut rng).unwrap();
    assert_eq!(second.poules_created, 3);
    assert_eq!(store.poules.len(), 3);
    assert!(store.poules.find_by_id(first.poules[0].id).is_none());
    assert_eq!(store.matches.len(), 0);
}

#[test]
fn four_competitors_meet_each_other_once() {
    let (mut store, t, c, competitors) = setup(4);
    let poule = single_poule(&mut store, t, c, &competitors);
    let generation = generate_poule_matches(&mut store, poule.id).unwrap();

    assert_eq!(generation.matches_generated, 6);
    let pairs: Vec<(CompetitorId, CompetitorId)> = generation
        .matches
        .iter()
        .map(|m| (m.competitor1.unwrap(), m.competitor2.unwrap()))
        .collect();
    let p = &competitors;
    assert_eq!(
        pairs,
        vec![
            (p[0], p[1]),
            (p[0], p[2]),
            (p[0], p[3]),
            (p[1], p[2]),
            (p[1], p[3]),
            (p[2], p[3]),
        ]
    );
    for (i, m) in generation.matches.iter().enumerate() {
        assert_eq!(m.match_index, i as u32);
        assert_eq!(m.kind, MatchKind::Poule);
        assert_eq!(m.status, MatchStatus::Pending);
        assert_eq!(m.poule, Some(poule.id));
    }
    assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Active);
}

#[test]
fn round_robin_covers_every_pair() {
    for n in 2..=9 {
        let (mut store, t, c, competitors) = setup(n);
        let poule = single_poule(&mut store, t, c, &competitors);
        let generation = generate_poule_matches(&mut store, poule.id).unwrap();
        assert_eq!(generation.matches_generated, n * (n - 1) / 2);

        let pairs: HashSet<(CompetitorId, CompetitorId)> = generation
            .matches
            .iter()
            .map(|m| {
                let (a, b) = (m.competitor1.unwrap(), m.competitor2.unwrap());
                assert_ne!(a, b);
                (a.min(b), a.max(b))
            })
            .collect();
        assert_eq!(pairs.len(), n * (n - 1) / 2);
    }
}

#[test]
fn round_robin_guards() {
    let (mut store, t, c, competitors) = setup(3);
    let lonely = single_poule(&mut store, t, c, &competitors[..1]);
    assert_eq!(
        generate_poule_matches(&mut store, lonely.id).unwrap_err(),
        EngineError::NotEnoughCompetitors {
            required: 2,
            given: 1
        }
    );

    let poule = single_poule(&mut store, t, c, &competitors);
    generate_poule_matches(&mut store, poule.id).unwrap();
    assert_eq!(
        generate_poule_matches(&mut store, poule.id).unwrap_err(),
        EngineError::PouleMatchesExist(poule.id)
    );
    assert!(matches!(
        generate_poule_matches(&mut store, uuid::Uuid::new_v4()),
        Err(EngineError::NotFound { .. })
    ));
}

#[test]
fn last_result_completes_the_poule() {
    let (mut store, t, c, competitors) = setup(3);
    let poule = single_poule(&mut store, t, c, &competitors);
    let matches = generate_poule_matches(&mut store, poule.id).unwrap().matches;
    let win = ResultUpdate {
        winner: WinnerUpdate::Set(Side::One),
        ..Default::default()
    };

    for m in &matches[..2] {
        record_match_result(&mut store, m.id, &win).unwrap();
        assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Active);
    }
    record_match_result(&mut store, matches[2].id, &win).unwrap();
    assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Completed);

    // Withdrawing a result reopens the poule.
    let clear = ResultUpdate {
        winner: WinnerUpdate::Clear,
        ..Default::default()
    };
    record_match_result(&mut store, matches[2].id, &clear).unwrap();
    assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Active);
}

#[test]
fn completion_check_without_matches_is_a_no_op() {
    let (mut store, t, c, competitors) = setup(2);
    let poule = single_poule(&mut store, t, c, &competitors);
    assert_eq!(
        check_poule_completion(&mut store, poule.id).unwrap(),
        PouleStatus::Pending
    );
}

#[test]
fn duplicate_or_unregistered_competitors_are_rejected() {
    let (mut store, t, c, competitors) = setup(4);
    let mut rng = StdRng::seed_from_u64(3);
    let doubled = [competitors[0], competitors[1], competitors[1]];
    assert_eq!(
        generate_poules(&mut store, &request(t, c, 2, &doubled), &mut rng).unwrap_err(),
        EngineError::DuplicateCompetitor(competitors[1])
    );

    let stranger = store.competitors.create(Competitor::new("No", "Entry")).id;
    let with_stranger = [competitors[0], stranger];
    assert_eq!(
        generate_poules(&mut store, &request(t, c, 1, &with_stranger), &mut rng).unwrap_err(),
        EngineError::UnregisteredCompetitor(stranger)
    );
    assert!(store.poules.is_empty());
}

#[test]
fn deleting_the_open_match_completes_the_poule() {
    let (mut store, t, c, competitors) = setup(3);
    let poule = single_poule(&mut store, t, c, &competitors);
    let matches = generate_poule_matches(&mut store, poule.id).unwrap().matches;
    let win = ResultUpdate {
        winner: WinnerUpdate::Set(Side::Two),
        ..Default::default()
    };
    for m in &matches[..2] {
        record_match_result(&mut store, m.id, &win).unwrap();
    }
    assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Active);

    let deleted = delete_match(&mut store, matches[2].id).unwrap();
    assert_eq!(deleted.id, matches[2].id);
    assert_eq!(store.poules.get(poule.id).unwrap().status, PouleStatus::Completed);
    assert!(matches!(
        delete_match(&mut store, matches[2].id),
        Err(EngineError::NotFound { .. })
    ));
}
