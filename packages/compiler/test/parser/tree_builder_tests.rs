/**
 * Tree Builder Tests
 *
 * AST shape, whitespace handling, structural directives, attribute classification
 * and the structural warnings reported while building the tree.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize_ast, messages, parse_template, parse_with, row};
    use template_compiler::config::{base_options, CompilerOptions, WhitespaceMode};

    mod nodes {
        use super::*;

        #[test]
        fn should_build_elements_text_and_expressions() {
            let (ast, diagnostics) = parse_template("<div><p>a</p>{{ b }}</div>");
            assert!(diagnostics.is_empty());
            assert_eq!(
                humanize_ast(&ast),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "a", "2"]),
                    row(&["Expression", "_s(b)", "1"]),
                ]
            );
        }

        #[test]
        fn should_build_mixed_interpolation_tokens() {
            let (ast, _) = parse_template("<p>Hi {{ name | upper }}!</p>");
            assert_eq!(
                humanize_ast(&ast)[1],
                row(&["Expression", "\"Hi \"+_s(_f(\"upper\")(name))+\"!\"", "1"])
            );
        }

        #[test]
        fn should_decode_entities_in_text() {
            let (ast, _) = parse_template("<p>a &amp; b &lt;</p>");
            assert_eq!(humanize_ast(&ast)[1], row(&["Text", "a & b <", "1"]));
        }

        #[test]
        fn should_decode_the_full_named_entity_set() {
            let (ast, _) = parse_template("<p>&check; &copy &hellip; &NotEqual;</p>");
            assert_eq!(
                humanize_ast(&ast)[1],
                row(&["Text", "\u{2713} \u{00A9} \u{2026} \u{2260}", "1"])
            );
        }

        #[test]
        fn should_keep_comments_when_enabled() {
            let options = CompilerOptions {
                comments: true,
                ..base_options()
            };
            let (ast, _) = parse_with("<div><!-- note --></div>", &options);
            assert_eq!(humanize_ast(&ast)[1], row(&["Comment", " note ", "1"]));
        }

        #[test]
        fn should_honor_custom_delimiters() {
            let options = CompilerOptions {
                delimiters: Some(("[[".to_string(), "]]".to_string())),
                ..base_options()
            };
            let (ast, _) = parse_with("<p>[[ a ]] {{ b }}</p>", &options);
            assert_eq!(
                humanize_ast(&ast)[1],
                row(&["Expression", "_s(a)+\" {{ b }}\"", "1"])
            );
        }

        #[test]
        fn should_inherit_the_svg_namespace() {
            let (ast, _) = parse_template("<svg><circle></circle></svg>");
            let root = ast.root_element().unwrap();
            assert_eq!(root.ns, Some("svg"));
            assert_eq!(ast.el(root.children[0]).ns, Some("svg"));
        }

        #[test]
        fn should_record_parent_links() {
            let (ast, _) = parse_template("<div><p></p></div>");
            let root_id = ast.root.unwrap();
            let child = ast.el(root_id).children[0];
            assert_eq!(ast.el(child).parent, Some(root_id));
        }
    }

    mod whitespace {
        use super::*;

        const TEMPLATE: &str = "<div>\n  <p>a</p>\n  <p>b</p>\n</div>";

        #[test]
        fn should_preserve_whitespace_between_elements_as_a_space() {
            let (ast, _) = parse_template(TEMPLATE);
            assert_eq!(
                humanize_ast(&ast),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "a", "2"]),
                    row(&["Text", " ", "1"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "b", "2"]),
                ]
            );
        }

        #[test]
        fn should_drop_line_breaks_in_condense_mode() {
            let options = CompilerOptions {
                whitespace: Some(WhitespaceMode::Condense),
                ..base_options()
            };
            let (ast, _) = parse_with(TEMPLATE, &options);
            assert_eq!(
                humanize_ast(&ast),
                vec![
                    row(&["Element", "div", "0"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "a", "2"]),
                    row(&["Element", "p", "1"]),
                    row(&["Text", "b", "2"]),
                ]
            );
        }

        #[test]
        fn should_collapse_runs_in_condense_mode() {
            let options = CompilerOptions {
                whitespace: Some(WhitespaceMode::Condense),
                ..base_options()
            };
            let (ast, _) = parse_with("<p>  a   b  </p>", &options);
            assert_eq!(humanize_ast(&ast)[1], row(&["Text", " a b ", "1"]));
        }

        #[test]
        fn should_keep_text_inside_pre_verbatim() {
            let (ast, _) = parse_template("<div><pre>\n  a\n</pre></div>");
            assert_eq!(humanize_ast(&ast)[2], row(&["Text", "  a\n", "2"]));
        }
    }

    mod root_constraints {
        use super::*;

        #[test]
        fn should_warn_once_about_multiple_roots() {
            let (ast, diagnostics) = parse_template("<div></div><p></p><span></span>");
            assert_eq!(ast.root_element().unwrap().tag, "div");
            assert_eq!(
                messages(&diagnostics),
                vec!["Component template should contain exactly one root element. \
                      If you are using v-if on multiple elements, use v-else-if to chain them instead."]
            );
        }

        #[test]
        fn should_allow_conditional_roots() {
            let (ast, diagnostics) =
                parse_template("<div v-if=\"a\"></div><p v-else-if=\"b\"></p><span v-else></span>");
            assert!(diagnostics.is_empty());
            let exps: Vec<Option<&str>> = ast
                .root_element()
                .unwrap()
                .if_conditions
                .iter()
                .map(|c| c.exp.as_deref())
                .collect();
            assert_eq!(exps, vec![Some("a"), Some("b"), None]);
        }

        #[test]
        fn should_reject_template_and_v_for_roots() {
            let (_, diagnostics) = parse_template("<template><p></p></template>");
            assert_eq!(
                messages(&diagnostics),
                vec!["Cannot use <template> as component root element because it may contain multiple nodes."]
            );
            let (_, diagnostics) = parse_template("<div v-for=\"i in l\"></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["Cannot use v-for on stateful component root element because it renders multiple elements."]
            );
        }

        #[test]
        fn should_warn_about_text_outside_the_root() {
            let (_, diagnostics) = parse_template("<div></div>text");
            assert_eq!(
                messages(&diagnostics),
                vec!["text \"text\" outside root element will be ignored."]
            );
        }
    }

    mod conditionals {
        use super::*;

        #[test]
        fn should_chain_branches_onto_the_v_if_element() {
            let (ast, diagnostics) = parse_template(
                "<div><p v-if=\"a\">1</p><p v-else-if=\"b\">2</p><p v-else>3</p></div>",
            );
            assert!(diagnostics.is_empty());
            let root = ast.root_element().unwrap();
            assert_eq!(root.children.len(), 1);
            let first = ast.el(root.children[0]);
            assert_eq!(first.if_exp.as_deref(), Some("a"));
            assert_eq!(first.if_conditions.len(), 3);
            assert!(ast.el(first.if_conditions[2].block).is_else);
        }

        #[test]
        fn should_drop_text_between_branches() {
            let (ast, diagnostics) =
                parse_template("<div><p v-if=\"a\"></p>text<p v-else></p></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["text \"text\" between v-if and v-else(-if) will be ignored."]
            );
            assert_eq!(ast.root_element().unwrap().children.len(), 1);
        }

        #[test]
        fn should_drop_an_else_without_if() {
            let (ast, diagnostics) = parse_template("<div><p v-else></p></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["v-else used on element <p> without corresponding v-if."]
            );
            assert!(ast.root_element().unwrap().children.is_empty());
        }
    }

    mod loops {
        use super::*;

        #[test]
        fn should_parse_aliases_and_iterators() {
            let (ast, _) = parse_template("<ul><li v-for=\"(item, i) in items\"></li></ul>");
            let root = ast.root_element().unwrap();
            let clause = ast.el(root.children[0]).for_clause.clone().unwrap();
            assert_eq!(clause.alias, "item");
            assert_eq!(clause.iterator1.as_deref(), Some("i"));
            assert_eq!(clause.for_exp, "items");
        }

        #[test]
        fn should_report_invalid_expressions() {
            let (_, diagnostics) = parse_template("<div><p v-for=\"item\"></p></div>");
            assert_eq!(messages(&diagnostics), vec!["Invalid v-for expression: item"]);
        }

        #[test]
        fn should_mark_refs_inside_loops() {
            let (ast, _) = parse_template("<div><p v-for=\"i in l\" ref=\"x\"></p></div>");
            let p = ast.el(ast.root_element().unwrap().children[0]);
            assert_eq!(p.ref_name.as_deref(), Some("\"x\""));
            assert!(p.ref_in_for);
        }

        #[test]
        fn should_warn_about_v_model_on_the_alias() {
            let (_, diagnostics) =
                parse_template("<div><input v-for=\"item in items\" v-model=\"item\"></div>");
            let messages = messages(&diagnostics);
            assert_eq!(messages.len(), 1);
            assert!(messages[0].starts_with(
                "<input v-model=\"item\">: You are binding v-model directly to a v-for iteration alias."
            ));
        }

        #[test]
        fn should_not_key_templates() {
            let (_, diagnostics) = parse_template("<div><template key=\"a\"><p></p></template></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["<template> cannot be keyed. Place the key on real elements instead."]
            );
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_classify_attributes_bindings_events_and_directives() {
            let (ast, diagnostics) = parse_template(
                "<div id=\"a\" :title=\"t\" @click=\"go\" v-custom:arg.mod=\"v\"></div>",
            );
            assert!(diagnostics.is_empty());
            let root = ast.root_element().unwrap();
            let attrs: Vec<(&str, &str)> = root
                .attrs
                .iter()
                .map(|a| (a.name.as_str(), a.value.as_str()))
                .collect();
            assert_eq!(attrs, vec![("id", "\"a\""), ("title", "t")]);
            assert_eq!(root.events["click"][0].value, "go");
            let directive = &root.directives[0];
            assert_eq!(directive.name, "custom");
            assert_eq!(directive.raw_name, "v-custom:arg.mod");
            assert_eq!(directive.arg.as_deref(), Some("arg"));
            assert!(directive.has_modifier("mod"));
            assert!(root.has_bindings);
            assert!(!root.plain);
        }

        #[test]
        fn should_keep_dynamic_names_apart() {
            let (ast, _) = parse_template("<div :[name]=\"v\"></div>");
            let root = ast.root_element().unwrap();
            assert!(root.attrs.is_empty());
            assert_eq!(root.dynamic_attrs[0].name, "name");
            assert!(root.dynamic_attrs[0].dynamic);
        }

        #[test]
        fn should_bind_props_with_the_prop_modifier() {
            let (ast, _) = parse_template("<div :inner-html.prop=\"h\"></div>");
            let root = ast.root_element().unwrap();
            assert_eq!(root.props[0].name, "innerHTML");
            assert_eq!(root.props[0].value, "h");
        }

        #[test]
        fn should_add_update_listeners_for_sync() {
            let (ast, _) = parse_template("<div><my-comp :foo-bar.sync=\"x\"></my-comp></div>");
            let comp = ast.el(ast.root_element().unwrap().children[0]);
            let names: Vec<&str> = comp.events.keys().map(String::as_str).collect();
            assert_eq!(names, vec!["update:fooBar", "update:foo-bar"]);
            assert_eq!(comp.events["update:fooBar"][0].value, "x=$event");
            assert_eq!(comp.attrs[0].name, "foo-bar");
        }

        #[test]
        fn should_warn_about_interpolation_in_attributes() {
            let (_, diagnostics) = parse_template("<div id=\"{{ a }}\"></div>");
            assert!(messages(&diagnostics)[0]
                .starts_with("id=\"{{ a }}\": Interpolation inside attributes has been removed."));
        }

        #[test]
        fn should_warn_about_empty_bindings() {
            let (_, diagnostics) = parse_template("<div :id=\"\"></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["The value for a v-bind expression cannot be empty. Found in \"v-bind:id\""]
            );
        }

        #[test]
        fn should_keep_raw_attributes_under_v_pre() {
            let (ast, _) = parse_template("<div v-pre><p :id=\"a\">{{ b }}</p></div>");
            let root = ast.root_element().unwrap();
            assert!(root.pre);
            let p = ast.el(root.children[0]);
            assert_eq!(p.attrs[0].name, ":id");
            assert_eq!(p.attrs[0].value, "\"a\"");
            assert_eq!(humanize_ast(&ast)[2], row(&["Text", "{{ b }}", "2"]));
        }

        #[test]
        fn should_forbid_side_effect_tags() {
            let (ast, diagnostics) = parse_template("<div><style>a{}</style></div>");
            assert!(ast.root_element().unwrap().children.is_empty());
            assert!(messages(&diagnostics)[0].contains("such as <style>"));
        }
    }
}
