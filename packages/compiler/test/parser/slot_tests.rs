/**
 * Slot Tests
 *
 * Slot content (`v-slot`, `#name`, legacy `slot` / `slot-scope`) and slot outlets.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{messages, parse_template};
    use template_compiler::parser::EMPTY_SLOT_SCOPE_TOKEN;

    mod v_slot {
        use super::*;

        #[test]
        fn should_move_named_templates_into_the_slot_map() {
            let (ast, diagnostics) = parse_template(
                "<my-comp><template v-slot:header=\"props\">{{props.a}}</template></my-comp>",
            );
            assert!(diagnostics.is_empty());
            let root = ast.root_element().unwrap();
            assert!(root.children.is_empty());
            let slot = ast.el(root.scoped_slots["\"header\""]);
            assert_eq!(slot.slot_scope.as_deref(), Some("props"));
            assert!(!slot.slot_target_dynamic);
        }

        #[test]
        fn should_wrap_component_content_for_a_default_slot() {
            let (ast, _) = parse_template("<my-comp v-slot=\"{ item }\">{{ item }}</my-comp>");
            let root = ast.root_element().unwrap();
            assert!(root.children.is_empty());
            let container_id = root.scoped_slots["\"default\""];
            let container = ast.el(container_id);
            assert_eq!(container.tag, "template");
            assert_eq!(container.slot_scope.as_deref(), Some("{ item }"));
            assert_eq!(container.children.len(), 1);
            assert_eq!(container.parent, ast.root);
        }

        #[test]
        fn should_use_a_placeholder_scope_without_a_value() {
            let (ast, _) = parse_template("<my-comp><template #default>x</template></my-comp>");
            let root = ast.root_element().unwrap();
            let slot = ast.el(root.scoped_slots["\"default\""]);
            assert_eq!(slot.slot_scope.as_deref(), Some(EMPTY_SLOT_SCOPE_TOKEN));
        }

        #[test]
        fn should_support_dynamic_slot_names() {
            let (ast, _) =
                parse_template("<my-comp><template v-slot:[name]>x</template></my-comp>");
            let root = ast.root_element().unwrap();
            let slot = ast.el(root.scoped_slots["name"]);
            assert!(slot.slot_target_dynamic);
        }

        #[test]
        fn should_require_a_name_for_the_shorthand() {
            let (_, diagnostics) =
                parse_template("<my-comp><template #=\"p\">x</template></my-comp>");
            assert_eq!(
                messages(&diagnostics),
                vec!["v-slot shorthand syntax requires a slot name."]
            );
        }

        #[test]
        fn should_reject_v_slot_on_plain_elements() {
            let (_, diagnostics) = parse_template("<div v-slot=\"p\"></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["v-slot can only be used on components or <template>."]
            );
        }

        #[test]
        fn should_reject_slot_templates_outside_components() {
            let (_, diagnostics) = parse_template("<div><template v-slot:a>x</template></div>");
            assert_eq!(
                messages(&diagnostics),
                vec!["<template v-slot> can only appear at the root level inside the receiving component"]
            );
        }

        #[test]
        fn should_warn_about_a_default_slot_next_to_named_slots() {
            let (_, diagnostics) = parse_template(
                "<my-comp v-slot=\"p\"><template v-slot:other>x</template></my-comp>",
            );
            assert!(messages(&diagnostics)[0].starts_with("To avoid scope ambiguity"));
        }
    }

    mod legacy_syntax {
        use super::*;

        #[test]
        fn should_keep_the_slot_attribute_on_elements() {
            let (ast, _) = parse_template("<my-comp><p slot=\"footer\">x</p></my-comp>");
            let p = ast.el(ast.root_element().unwrap().children[0]);
            assert_eq!(p.slot_target.as_deref(), Some("\"footer\""));
            assert_eq!(p.attrs[0].name, "slot");
            assert_eq!(p.attrs[0].value, "\"footer\"");
        }

        #[test]
        fn should_bind_dynamic_slot_targets() {
            let (ast, _) = parse_template("<my-comp><p :slot=\"n\">x</p></my-comp>");
            let p = ast.el(ast.root_element().unwrap().children[0]);
            assert_eq!(p.slot_target.as_deref(), Some("n"));
            assert!(p.slot_target_dynamic);
        }

        #[test]
        fn should_treat_slot_scope_elements_as_scoped_slots() {
            let (ast, _) = parse_template("<my-comp><p slot-scope=\"s\">{{ s }}</p></my-comp>");
            let root = ast.root_element().unwrap();
            assert!(root.children.is_empty());
            assert_eq!(
                ast.el(root.scoped_slots["\"default\""]).slot_scope.as_deref(),
                Some("s")
            );
        }

        #[test]
        fn should_give_a_tip_for_the_scope_attribute() {
            let (ast, diagnostics) =
                parse_template("<my-comp><template scope=\"s\">x</template></my-comp>");
            assert_eq!(diagnostics.entries().len(), 1);
            assert!(diagnostics.entries()[0].is_tip());
            let root = ast.root_element().unwrap();
            assert_eq!(
                ast.el(root.scoped_slots["\"default\""]).slot_scope.as_deref(),
                Some("s")
            );
        }
    }

    mod outlets {
        use super::*;

        #[test]
        fn should_record_the_outlet_name() {
            let (ast, _) = parse_template("<div><slot name=\"foo\">fb</slot></div>");
            let slot = ast.el(ast.root_element().unwrap().children[0]);
            assert_eq!(slot.slot_name.as_deref(), Some("\"foo\""));
        }

        #[test]
        fn should_warn_about_keyed_outlets() {
            let (_, diagnostics) = parse_template("<div><slot key=\"a\"></slot></div>");
            assert!(messages(&diagnostics)[0].starts_with("`key` does not work on <slot>"));
        }

        #[test]
        fn should_reject_an_outlet_as_root() {
            let (_, diagnostics) = parse_template("<slot></slot>");
            assert_eq!(
                messages(&diagnostics),
                vec!["Cannot use <slot> as component root element because it may contain multiple nodes."]
            );
        }
    }
}
