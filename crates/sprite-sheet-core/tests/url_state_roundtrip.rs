use sprite_sheet_core::model::{Rect, Rectangle};
use sprite_sheet_core::session::SessionState;
use sprite_sheet_core::url_state::{self, VERSION_PREFIX};

fn plain(rects: &[Rectangle]) -> Vec<(String, u32, u32, u32, u32)> {
    rects
        .iter()
        .map(|r| (r.name.clone(), r.x, r.y, r.w, r.h))
        .collect()
}

#[test]
fn encode_then_decode_keeps_names_and_coordinates() {
    let rects = vec![
        Rectangle::new("play", Rect::new(0, 0, 32, 32)),
        Rectangle::new("stop_2", Rect::new(34, 0, 16, 20)),
        Rectangle::new("big-one", Rect::new(0, 34, 4000, 1)),
    ];
    let text = url_state::encode(&rects);
    assert_eq!(text, "v1|play:0,0,32,32;stop_2:34,0,16,20;big-one:0,34,4000,1");

    let back = url_state::decode(&text);
    assert_eq!(plain(&back), plain(&rects));
    // ids are never carried
    for (a, b) in back.iter().zip(&rects) {
        assert_ne!(a.id, b.id);
    }
}

#[test]
fn empty_list_roundtrips() {
    let text = url_state::encode(&[]);
    assert_eq!(text, VERSION_PREFIX);
    assert!(url_state::decode(&text).is_empty());
}

#[test]
fn missing_prefix_decodes_to_nothing() {
    assert!(url_state::decode("").is_empty());
    assert!(url_state::decode("play:0,0,32,32").is_empty());
    assert!(url_state::decode("v2|play:0,0,32,32").is_empty());
}

#[test]
fn malformed_record_is_skipped_not_fatal() {
    let rects = url_state::decode("v1|a:1,2,3,x;b:0,0,10,10");
    assert_eq!(plain(&rects), vec![("b".to_string(), 0, 0, 10, 10)]);
}

#[test]
fn report_lists_every_skipped_record() {
    let (rects, skipped) =
        url_state::decode_with_report("v1|neg:-1,0,2,2;;flat:0,0,0,5;ok:1,1,1,1;long:1,2,3,4,5");
    assert_eq!(plain(&rects), vec![("ok".to_string(), 1, 1, 1, 1)]);
    let reasons: Vec<(usize, &str, &str)> = skipped
        .iter()
        .map(|s| (s.index, s.raw.as_str(), s.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (0, "neg:-1,0,2,2", "coordinate is not a number"),
            (2, "flat:0,0,0,5", "zero-sized rectangle"),
            (4, "long:1,2,3,4,5", "expected four coordinates"),
        ]
    );
}

#[test]
fn decoded_names_are_sanitized() {
    let rects = url_state::decode("v1|hello world!:0,0,1,1");
    assert_eq!(rects[0].name, "hello-world-");

    // no reserved character involved, still normalized
    let rects = url_state::decode("v1|a.b:0,0,1,1");
    assert_eq!(rects[0].name, "a-b");
}

#[test]
fn fragments_carry_a_hash() {
    let state = SessionState::single_image(64, 64)
        .with_rectangle("icon", Rect::new(1, 2, 3, 4))
        .expect("inside canvas");
    let fragment = state.fragment();
    assert_eq!(fragment, "#v1|icon:1,2,3,4");
    assert_eq!(plain(&url_state::from_fragment(&fragment)), plain(&state.rectangles));
    assert_eq!(
        plain(&url_state::from_fragment("v1|icon:1,2,3,4")),
        plain(&state.rectangles)
    );
}
