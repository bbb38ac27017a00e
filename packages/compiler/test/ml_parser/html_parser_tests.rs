/**
 * HTML Scanner Tests
 *
 * Event streams produced by the markup scanner, including HTML recovery rules,
 * raw text containers, attribute decoding and source positions.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize_events, row, scan_with, ScanOptions};
    use template_compiler::platform::{NullPlatform, WebPlatform};

    mod text_nodes {
        use super::*;

        #[test]
        fn should_report_root_level_text() {
            assert_eq!(humanize_events("a"), vec![row(&["Text", "a"])]);
        }

        #[test]
        fn should_not_decode_entities_in_text() {
            assert_eq!(
                humanize_events("<p>a &amp; b</p>"),
                vec![row(&["Start", "p"]), row(&["Text", "a &amp; b"]), row(&["End", "p"])]
            );
        }

        #[test]
        fn should_flush_an_unterminated_comment_as_text() {
            assert_eq!(humanize_events("<!-- x"), vec![row(&["Text", "<!-- x"])]);
        }

        #[test]
        fn should_flush_a_truncated_start_tag_as_text() {
            assert_eq!(humanize_events("<div id="), vec![row(&["Text", "<div id="])]);
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_report_void_and_self_closing_tags_as_unary() {
            assert_eq!(
                humanize_events("<input><my-comp/>"),
                vec![row(&["Void", "input"]), row(&["Void", "my-comp"])]
            );
        }

        #[test]
        fn should_match_end_tags_case_insensitively() {
            assert_eq!(
                humanize_events("<DIV></div>"),
                vec![row(&["Start", "DIV"]), row(&["End", "DIV"])]
            );
        }

        #[test]
        fn should_ignore_stray_end_tags() {
            assert_eq!(
                humanize_events("<div></span></div>"),
                vec![row(&["Start", "div"]), row(&["End", "div"])]
            );
        }

        #[test]
        fn should_not_apply_html_rules_without_expect_html() {
            let options = ScanOptions {
                expect_html: false,
                ..ScanOptions::default()
            };
            assert_eq!(
                scan_with("<p><div></div>", options, &WebPlatform).events,
                vec![
                    row(&["Start", "p"]),
                    row(&["Start", "div"]),
                    row(&["End", "div"]),
                    row(&["End", "p"]),
                ]
            );
        }

        #[test]
        fn should_ask_the_platform_which_tags_are_void() {
            assert_eq!(
                scan_with("<input><b></b>", ScanOptions::default(), &NullPlatform).events,
                vec![
                    row(&["Start", "input"]),
                    row(&["Start", "b"]),
                    row(&["End", "b"]),
                    row(&["End", "input"]),
                ]
            );
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_decode_attribute_entities() {
            assert_eq!(
                humanize_events(r#"<div title="a &amp; b &lt;c&gt;"></div>"#),
                vec![row(&["Start", "div", "title=a & b <c>"]), row(&["End", "div"])]
            );
        }

        #[test]
        fn should_decode_newlines_only_when_asked() {
            let html = r#"<div title="a&#10;b"></div>"#;
            assert_eq!(humanize_events(html)[0], row(&["Start", "div", "title=a&#10;b"]));

            let options = ScanOptions {
                decode_newlines: true,
                ..ScanOptions::default()
            };
            assert_eq!(
                scan_with(html, options, &WebPlatform).events[0],
                row(&["Start", "div", "title=a\nb"])
            );
        }

        #[test]
        fn should_use_the_href_flag_for_anchor_hrefs() {
            let options = ScanOptions {
                decode_newlines: true,
                ..ScanOptions::default()
            };
            assert_eq!(
                scan_with(r#"<a href="x&#10;y"></a>"#, options, &WebPlatform).events[0],
                row(&["Start", "a", "href=x&#10;y"])
            );
        }

        #[test]
        fn should_keep_modifiers_and_shorthands_in_names() {
            assert_eq!(
                humanize_events(r#"<b @click.stop="go" #default="p" v-bind:[k].sync="v"></b>"#)[0],
                row(&["Start", "b", "@click.stop=go", "#default=p", "v-bind:[k].sync=v"])
            );
        }
    }

    mod raw_text {
        use super::*;

        #[test]
        fn should_keep_style_content_verbatim() {
            assert_eq!(
                humanize_events("<style>a > b { }</style>"),
                vec![
                    row(&["Start", "style"]),
                    row(&["Text", "a > b { }"]),
                    row(&["End", "style"]),
                ]
            );
        }

        #[test]
        fn should_strip_cdata_wrappers_in_textarea() {
            assert_eq!(
                humanize_events("<textarea><![CDATA[x<y]]></textarea>")[1],
                row(&["Text", "x<y"])
            );
        }

        #[test]
        fn should_close_a_raw_text_container_without_end_tag() {
            assert_eq!(
                humanize_events("<script>abc"),
                vec![
                    row(&["Start", "script"]),
                    row(&["End", "script"]),
                    row(&["Text", "abc"]),
                ]
            );
        }
    }

    mod comments {
        use super::*;

        #[test]
        fn should_report_comments_when_kept() {
            let options = ScanOptions {
                keep_comments: true,
                ..ScanOptions::default()
            };
            let recorder = scan_with("<!--a--><b></b>", options, &WebPlatform);
            assert_eq!(recorder.events[0], row(&["Comment", "a"]));
            assert_eq!(recorder.spans[0], (0, 8));
        }

        #[test]
        fn should_skip_conditional_comments() {
            assert_eq!(
                humanize_events("<![if !IE]><b></b>"),
                vec![row(&["Start", "b"]), row(&["End", "b"])]
            );
        }
    }

    mod source_positions {
        use super::*;

        #[test]
        fn should_report_offsets_for_every_event() {
            let recorder = scan_with("<div>hi</div>", ScanOptions::default(), &WebPlatform);
            assert_eq!(recorder.spans, vec![(0, 5), (5, 7), (7, 13)]);
        }

        #[test]
        fn should_close_open_tags_at_the_end_of_input() {
            let recorder = scan_with("<div>", ScanOptions::default(), &WebPlatform);
            assert_eq!(recorder.events[1], row(&["End", "div"]));
            assert_eq!(recorder.spans[1], (5, 5));
        }
    }
}
