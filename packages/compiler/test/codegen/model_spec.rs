/**
 * v-model Codegen Tests
 *
 * Form element expansions, component models and the related warnings.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{compile_with, messages, render_body};
    use template_compiler::config::base_options;

    mod text_inputs {
        use super::*;

        #[test]
        fn should_bind_value_and_listen_to_input() {
            assert_eq!(
                render_body("<input v-model=\"msg\">"),
                "_c('input',{directives:[{name:\"model\",rawName:\"v-model\",value:(msg),expression:\"msg\"}],domProps:{\"value\":(msg)},on:{\"input\":function($event){if($event.target.composing)return;msg=$event.target.value}}})"
            );
        }

        #[test]
        fn should_use_set_for_member_paths() {
            assert!(render_body("<input v-model=\"form.name\">").contains(
                "on:{\"input\":function($event){if($event.target.composing)return;$set(form, \"name\", $event.target.value)}}"
            ));
        }

        #[test]
        fn should_apply_lazy_and_trim() {
            assert_eq!(
                render_body("<input v-model.trim.lazy=\"msg\">"),
                "_c('input',{directives:[{name:\"model\",rawName:\"v-model.trim.lazy\",value:(msg),expression:\"msg\",modifiers:{\"trim\":true,\"lazy\":true}}],domProps:{\"value\":(msg)},on:{\"change\":function($event){msg=$event.target.value.trim()},\"blur\":function($event){return $forceUpdate()}}})"
            );
        }

        #[test]
        fn should_cast_numbers() {
            assert!(render_body("<input v-model.number=\"age\">")
                .contains("age=_n($event.target.value)"));
        }

        #[test]
        fn should_listen_to_the_range_token() {
            assert!(render_body("<input type=\"range\" v-model=\"n\">")
                .contains("on:{\"__r\":function($event){n=$event.target.value}}"));
        }
    }

    mod choice_inputs {
        use super::*;

        #[test]
        fn should_expand_checkboxes() {
            assert_eq!(
                render_body("<input type=\"checkbox\" v-model=\"checked\">"),
                "_c('input',{directives:[{name:\"model\",rawName:\"v-model\",value:(checked),expression:\"checked\"}],attrs:{\"type\":\"checkbox\"},domProps:{\"checked\":Array.isArray(checked)?_i(checked,null)>-1:(checked)},on:{\"change\":function($event){var $$a=checked,$$el=$event.target,$$c=$$el.checked?(true):(false);if(Array.isArray($$a)){var $$v=null,$$i=_i($$a,$$v);if($$el.checked){$$i<0&&(checked=$$a.concat([$$v]))}else{$$i>-1&&(checked=$$a.slice(0,$$i).concat($$a.slice($$i+1)))}}else{checked=$$c}}}})"
            );
        }

        #[test]
        fn should_expand_radios() {
            assert_eq!(
                render_body("<input type=\"radio\" v-model=\"pick\" value=\"a\">"),
                "_c('input',{directives:[{name:\"model\",rawName:\"v-model\",value:(pick),expression:\"pick\"}],attrs:{\"type\":\"radio\",\"value\":\"a\"},domProps:{\"checked\":_q(pick,\"a\")},on:{\"change\":function($event){pick=\"a\"}}})"
            );
        }

        #[test]
        fn should_expand_selects() {
            assert_eq!(
                render_body("<select v-model=\"sel\"><option>a</option></select>"),
                "_c('select',{directives:[{name:\"model\",rawName:\"v-model\",value:(sel),expression:\"sel\"}],on:{\"change\":function($event){var $$selectedVal = Array.prototype.filter.call($event.target.options,function(o){return o.selected}).map(function(o){var val = \"_value\" in o ? o._value : o.value;return val}); sel=$event.target.multiple ? $$selectedVal : $$selectedVal[0]}}},[_c('option',[_v(\"a\")])])"
            );
        }
    }

    mod components {
        use super::*;

        #[test]
        fn should_generate_a_model_entry() {
            assert_eq!(
                render_body("<my-comp v-model=\"val\"></my-comp>"),
                "_c('my-comp',{model:{value:(val),callback:function ($$v) {val=$$v},expression:\"val\"}})"
            );
        }

        #[test]
        fn should_trim_component_values() {
            assert!(render_body("<my-comp v-model.trim=\"val\"></my-comp>").contains(
                "callback:function ($$v) {val=(typeof $$v === 'string'? $$v.trim(): $$v)}"
            ));
        }
    }

    mod warnings {
        use super::*;

        #[test]
        fn should_warn_about_file_inputs() {
            let (_, diagnostics) =
                compile_with("<input type=\"file\" v-model=\"f\">", &base_options());
            assert_eq!(
                messages(&diagnostics),
                vec!["<input v-model=\"f\" type=\"file\">:\nFile inputs are read only. Use a v-on:change listener instead."]
            );
        }

        #[test]
        fn should_warn_about_unsupported_elements() {
            let (code, diagnostics) = compile_with("<div v-model=\"x\"></div>", &base_options());
            assert!(messages(&diagnostics)[0]
                .starts_with("<div v-model=\"x\">: v-model is not supported on this element type."));
            assert!(code.render.contains("directives:[{name:\"model\""));
        }

        #[test]
        fn should_warn_about_a_conflicting_value_binding() {
            let (_, diagnostics) =
                compile_with("<input v-model=\"a\" :value=\"b\">", &base_options());
            assert_eq!(
                messages(&diagnostics),
                vec![":value=\"b\" conflicts with v-model on the same element because the latter already expands to a value binding internally"]
            );
        }
    }
}
