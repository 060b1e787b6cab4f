use chrono::NaiveDate;
use proptest::prelude::*;
use webp_batch_lib::NamingOptions;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
}

fn extension() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["png", "jpg", "jpeg", "gif", "bmp", "tiff"])
}

proptest! {
    #[test]
    fn suffix_is_appended_to_the_stem(
        stem in "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,11}",
        ext in extension(),
        suffix in "[a-zA-Z0-9_-]{1,8}",
        index in 1usize..2000,
    ) {
        let naming = NamingOptions::add_suffix(suffix.clone());
        let out = naming.output_stem(&format!("{stem}.{ext}"), index, date());
        prop_assert_eq!(out, format!("{stem}{suffix}"));
    }

    #[test]
    fn keep_original_is_stable_on_its_own_output(
        stem in "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,11}",
        ext in extension(),
        index in 1usize..2000,
    ) {
        let naming = NamingOptions::keep_original();
        let once = naming.output_stem(&format!("{stem}.{ext}"), index, date());
        prop_assert_eq!(&once, &stem);

        let twice = naming.output_stem(&format!("{once}.webp"), index, date());
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn output_never_contains_path_separators(
        file_name in ".{1,16}",
        pattern in "[a-z{}/\\\\_]{0,8}(\\{name\\}|\\{index\\}|\\{date\\}|/|\\\\){0,4}",
        suffix in ".{0,8}",
        index in 1usize..2000,
    ) {
        for naming in [
            NamingOptions::keep_original(),
            NamingOptions::add_suffix(suffix.clone()),
            NamingOptions::custom(pattern.clone()),
        ] {
            let out = naming.output_stem(&file_name, index, date());
            prop_assert!(!out.contains('/') && !out.contains('\\'), "{:?} -> {:?}", naming, out);
        }
    }
}
