use sb_test_example::{story_dir, story_names, testcase_path};
use sb_tool::assert_case;

#[test]
fn every_bundled_story_matches_its_testcase() {
    let names = story_names();
    assert!(!names.is_empty(), "expected bundled stories");

    for name in names {
        let case_path = testcase_path(&name);
        if !case_path.is_file() {
            continue;
        }
        if let Err(error) = assert_case(&story_dir(&name), &case_path) {
            panic!("story {} failed: {}", name, error);
        }
    }
}

#[test]
fn basic_choices_story_restores_visits_after_back() {
    let report = sb_tool::run_case(
        &story_dir("01-basic-choices"),
        &sb_tool::read_test_case(&testcase_path("01-basic-choices")).expect("case should parse"),
    )
    .expect("run should pass");
    assert_eq!(report.consumed_actions, 4);
    assert_eq!(report.final_variables["visits"], serde_json::json!(1));
}
