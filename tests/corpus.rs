use std::collections::HashSet;
use std::path::PathBuf;

use emospeech::corpus::{checked_index, Corpus, GridCorpus, GridLayout, EMOVO};
use emospeech::{CorpusLayout, DatasetError, Split};

fn two_actor_layout() -> GridLayout {
    let CorpusLayout::Grid(emovo) = &*EMOVO else {
        panic!("EMOVO is a grid corpus");
    };
    GridLayout {
        name: "two-actor".into(),
        actors: vec!["m1".into(), "f1".into()],
        partition: None,
        ..emovo.clone()
    }
}

#[test]
fn every_index_maps_to_a_distinct_cell() {
    for split in [Split::Training, Split::Validation, Split::All] {
        let CorpusLayout::Grid(layout) = (*EMOVO).clone() else {
            unreachable!()
        };
        let corpus = GridCorpus::new("/data/emovo", layout.clone(), split);
        let mut cells = HashSet::new();
        let mut paths = HashSet::new();
        for idx in 0..corpus.len() {
            let item = corpus.resolve(idx).unwrap();
            let cell = item.cell.expect("grid items carry a cell");
            assert_eq!(layout.emotions[item.label], cell.emotion);
            assert!(cells.insert(cell));
            assert!(paths.insert(item.path));
        }
        let grid_size = corpus.actors().len() * layout.emotions.len() * layout.sentence_types.len();
        assert_eq!(cells.len(), grid_size);
        assert_eq!(corpus.len(), grid_size);
    }
}

#[test]
fn index_99_resolves_to_second_actor_second_sentence_type() {
    let layout = two_actor_layout();
    let corpus = GridCorpus::new("root", layout.clone(), Split::Training);
    assert_eq!(corpus.len(), 196);
    assert_eq!(corpus.decompose(99).unwrap(), (1, 0, 1));

    let item = corpus.resolve(99).unwrap();
    let expected = format!(
        "{}-f1-{}.wav",
        &layout.emotions[0][..3],
        layout.sentence_types[1]
    );
    assert_eq!(item.path, PathBuf::from("root").join("f1").join(expected));
    assert_eq!(item.path, PathBuf::from("root/f1/dis-f1-b2.wav"));
    assert_eq!(item.label, 0);
}

#[test]
fn out_of_range_indices_are_index_errors() {
    let corpus = GridCorpus::new("root", two_actor_layout(), Split::All);
    let len = corpus.len();
    assert!(matches!(
        corpus.resolve(len),
        Err(DatasetError::Index { index, len: l }) if index == len as i64 && l == len
    ));
    assert!(matches!(
        checked_index(-1, len),
        Err(DatasetError::Index { index: -1, .. })
    ));
    assert!(matches!(
        checked_index(len as i64, len),
        Err(DatasetError::Index { .. })
    ));
}

#[test]
fn resolution_is_deterministic() {
    let a = GridCorpus::new("root", two_actor_layout(), Split::All);
    let b = GridCorpus::new("root", two_actor_layout(), Split::All);
    for idx in [0, 13, 14, 97, 98, 195] {
        assert_eq!(a.resolve(idx).unwrap(), b.resolve(idx).unwrap());
    }
}

#[test]
fn custom_layout_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.json");
    std::fs::write(
        &path,
        r#"{
            "scheme": "grid",
            "name": "tiny",
            "emotions": ["rabbia", "gioia"],
            "actors": ["m1", "f1", "m2"],
            "sentence_types": ["b1", "b2", "b3"],
            "partition": {"training": ["m1", "f1"], "validation": ["m2"]}
        }"#,
    )
    .unwrap();
    let layout = CorpusLayout::lookup(path.to_str().unwrap()).unwrap();
    let CorpusLayout::Grid(grid) = layout else {
        panic!("expected grid layout");
    };
    assert_eq!(grid.per_actor(), 6);
    let validation = GridCorpus::new("r", grid, Split::Validation);
    assert_eq!(validation.len(), 6);
    assert_eq!(
        validation.resolve(5).unwrap().path,
        PathBuf::from("r/m2/gio-m2-b3.wav")
    );
}
