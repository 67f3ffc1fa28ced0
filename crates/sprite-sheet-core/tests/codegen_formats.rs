use serde_json::json;
use sprite_sheet_core::codegen::{OutputFormat, generate, generate_named};
use sprite_sheet_core::config::CodegenOptions;
use sprite_sheet_core::error::SpriteSheetError;
use sprite_sheet_core::model::{Rect, Rectangle};

fn rect(name: &str, x: u32, y: u32, w: u32, h: u32) -> Rectangle {
    Rectangle::new(name, Rect::new(x, y, w, h))
}

#[test]
fn json_single_sprite() {
    let out = generate(
        &[rect("play", 0, 0, 32, 32)],
        64,
        64,
        OutputFormat::Json,
        &CodegenOptions::default(),
    );
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value, json!({"play": {"x": 0, "y": 0, "width": 32, "height": 32}}));
}

#[test]
fn json_keys_follow_rectangle_order() {
    let rects = [rect("zeta", 0, 0, 1, 1), rect("alpha", 3, 0, 1, 1), rect("mid", 6, 0, 1, 1)];
    let out = generate(&rects, 7, 1, OutputFormat::Json, &CodegenOptions::default());
    let zeta = out.find("\"zeta\"").expect("zeta");
    let alpha = out.find("\"alpha\"").expect("alpha");
    let mid = out.find("\"mid\"").expect("mid");
    assert!(zeta < alpha && alpha < mid, "{out}");
}

#[test]
fn json_duplicate_name_keeps_later_value() {
    let rects = [rect("dup", 0, 0, 1, 1), rect("other", 2, 0, 1, 1), rect("dup", 4, 0, 5, 5)];
    let out = generate(&rects, 9, 5, OutputFormat::Json, &CodegenOptions::default());
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(value["dup"], json!({"x": 4, "y": 0, "width": 5, "height": 5}));
    assert!(out.find("\"dup\"") < out.find("\"other\""));
}

#[test]
fn css_has_base_class_and_negated_offsets() {
    let rects = [rect("play", 0, 0, 32, 32), rect("stop", 34, 0, 16, 20)];
    let out = generate(&rects, 50, 32, OutputFormat::Css, &CodegenOptions::default());
    let expected = "\
.sprite {
  background-image: url('sprite.png');
  background-repeat: no-repeat;
  background-size: 50px 32px;
  display: inline-block;
}

.sprite-play {
  width: 32px;
  height: 32px;
  background-position: 0px 0px;
}

.sprite-stop {
  width: 16px;
  height: 20px;
  background-position: -34px 0px;
}
";
    assert_eq!(out, expected);
}

#[test]
fn css_respects_options() {
    let opts = CodegenOptions {
        image_url: "img/icons.png".into(),
        class_prefix: "icon".into(),
    };
    let out = generate(&[rect("x", 1, 2, 3, 4)], 4, 6, OutputFormat::Css, &opts);
    assert!(out.contains(".icon {"));
    assert!(out.contains("url('img/icons.png')"));
    assert!(out.contains(".icon-x {"));
    assert!(out.contains("background-position: -1px -2px;"));
}

#[test]
fn scss_map_and_mixins() {
    let rects = [rect("play", 0, 0, 32, 32), rect("stop", 34, 2, 16, 20)];
    let out = generate(&rects, 50, 32, OutputFormat::Scss, &CodegenOptions::default());
    assert!(out.starts_with("$sprite-image: 'sprite.png';\n$sprite-width: 50px;\n$sprite-height: 32px;\n"));
    assert!(out.contains("$sprites: (\n  'play': (0px, 0px, 32px, 32px),\n  'stop': (-34px, -2px, 16px, 20px),\n);"));
    assert!(out.contains("@mixin sprite($name) {"));
    assert!(out.contains("@error \"Unknown sprite: #{$name}\";"));
    assert!(out.contains("background-size: $sprite-width $sprite-height;"));
    assert!(out.contains("@mixin sprite-highlight($color: #ff3e00) {"));
}

#[test]
fn empty_input_yields_placeholders() {
    let opts = CodegenOptions::default();
    assert_eq!(
        generate(&[], 0, 0, OutputFormat::Css, &opts),
        "/* No sprites defined yet. */\n"
    );
    assert_eq!(
        generate(&[], 0, 0, OutputFormat::Scss, &opts),
        "// No sprites defined yet.\n"
    );
    assert_eq!(generate(&[], 0, 0, OutputFormat::Json, &opts), "{}");
}

#[test]
fn format_names_parse_case_insensitively() {
    assert_eq!("CSS".parse::<OutputFormat>().expect("css"), OutputFormat::Css);
    assert_eq!("scss".parse::<OutputFormat>().expect("scss"), OutputFormat::Scss);
    assert_eq!("Json".parse::<OutputFormat>().expect("json"), OutputFormat::Json);
    for f in OutputFormat::ALL {
        assert_eq!(f.extension().parse::<OutputFormat>().expect("roundtrip"), f);
    }
}

#[test]
fn unknown_format_is_rejected() {
    let err = generate_named(&[rect("a", 0, 0, 1, 1)], 1, 1, "less", &CodegenOptions::default())
        .expect_err("unknown format");
    match err {
        SpriteSheetError::UnsupportedFormat(name) => assert_eq!(name, "less"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn generation_is_deterministic() {
    let rects = [rect("a", 0, 0, 3, 3), rect("b", 5, 0, 3, 3)];
    for f in OutputFormat::ALL {
        let one = generate(&rects, 8, 3, f, &CodegenOptions::default());
        let two = generate(&rects, 8, 3, f, &CodegenOptions::default());
        assert_eq!(one, two);
    }
}
