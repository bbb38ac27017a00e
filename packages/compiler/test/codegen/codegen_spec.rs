/**
 * Codegen Tests
 *
 * Render code for elements, data objects, structural directives, slots and
 * hoisted static trees.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{compile_with, messages, render, render_body};
    use template_compiler::config::{base_options, BindingMetadata, BindingType, CompilerOptions};

    mod elements {
        use super::*;

        #[test]
        fn should_generate_static_attributes() {
            assert_eq!(render_body("<div id=\"app\"></div>"), "_c('div',{attrs:{\"id\":\"app\"}})");
        }

        #[test]
        fn should_escape_text() {
            assert_eq!(render_body("<p>a \"b\"</p>"), "_c('p',[_v(\"a \\\"b\\\"\")])");
        }

        #[test]
        fn should_generate_class_and_style_bindings() {
            assert_eq!(
                render_body(
                    "<p class=\"a b\" :class=\"{c: d}\" style=\"color: red\" :style=\"s\"></p>"
                ),
                "_c('p',{staticClass:\"a b\",class:{c: d},staticStyle:{\"color\":\"red\"},style:(s)})"
            );
        }

        #[test]
        fn should_generate_key_and_ref() {
            assert_eq!(
                render_body("<div><p key=\"a\" ref=\"x\">t</p></div>"),
                "_c('div',[_c('p',{key:\"a\",ref:\"x\"},[_v(\"t\")])])"
            );
        }

        #[test]
        fn should_flag_refs_inside_loops() {
            assert_eq!(
                render_body("<div><p v-for=\"i in l\" ref=\"r\"></p></div>"),
                "_c('div',_l((l),function(i){return _c('p',{ref:\"r\",refInFor:true})}),0)"
            );
        }

        #[test]
        fn should_wrap_dynamic_attribute_names() {
            assert_eq!(
                render_body("<div :[key]=\"val\" id=\"a\"></div>"),
                "_c('div',_b({attrs:{\"id\":\"a\"}},\"div\",_d({},[key,val])))"
            );
        }

        #[test]
        fn should_emit_comments_when_kept() {
            let options = CompilerOptions {
                comments: true,
                ..base_options()
            };
            let (code, _) = compile_with("<div><!-- c --></div>", &options);
            assert_eq!(code.render, "with(this){return _c('div',[_e(\" c \")])}");
        }

        #[test]
        fn should_resolve_setup_bindings_for_tags() {
            let mut bindings = BindingMetadata::default();
            bindings.insert("MyComp", BindingType::SetupConst);
            let options = CompilerOptions {
                bindings: Some(bindings),
                ..base_options()
            };
            let (code, _) = compile_with("<my-comp></my-comp>", &options);
            assert_eq!(code.render, "with(this){return _c(MyComp)}");
        }

        #[test]
        fn should_ignore_setup_bindings_outside_script_setup() {
            let mut bindings = BindingMetadata {
                is_script_setup: Some(false),
                ..BindingMetadata::default()
            };
            bindings.insert("MyComp", BindingType::SetupConst);
            let options = CompilerOptions {
                bindings: Some(bindings),
                ..base_options()
            };
            let (code, _) = compile_with("<my-comp></my-comp>", &options);
            assert_eq!(code.render, "with(this){return _c('my-comp')}");
        }

        #[test]
        fn should_keep_reserved_tags_when_a_binding_shares_the_name() {
            let mut bindings = BindingMetadata::default();
            bindings.insert("Header", BindingType::SetupConst);
            let options = CompilerOptions {
                bindings: Some(bindings),
                ..base_options()
            };
            let (code, _) = compile_with("<header><span>{{x}}</span></header>", &options);
            assert_eq!(
                code.render,
                "with(this){return _c('header',[_c('span',[_v(_s(x))])])}"
            );
        }
    }

    mod directives {
        use super::*;

        #[test]
        fn should_emit_runtime_directives() {
            assert_eq!(
                render_body("<div v-show=\"ok\"></div>"),
                "_c('div',{directives:[{name:\"show\",rawName:\"v-show\",value:(ok),expression:\"ok\"}]})"
            );
        }

        #[test]
        fn should_emit_arguments_and_modifiers() {
            assert_eq!(
                render_body("<div v-focus:arg.a=\"x\"></div>"),
                "_c('div',{directives:[{name:\"focus\",rawName:\"v-focus:arg.a\",value:(x),expression:\"x\",arg:\"arg\",modifiers:{\"a\":true}}]})"
            );
            assert_eq!(
                render_body("<div v-focus:[arg]=\"x\"></div>"),
                "_c('div',{directives:[{name:\"focus\",rawName:\"v-focus:[arg]\",value:(x),expression:\"x\",arg:arg}]})"
            );
        }

        #[test]
        fn should_turn_text_and_html_into_dom_props() {
            assert_eq!(
                render_body("<p v-text=\"msg\"></p>"),
                "_c('p',{domProps:{\"textContent\":_s(msg)}})"
            );
            assert_eq!(
                render_body("<p v-html=\"raw\"></p>"),
                "_c('p',{domProps:{\"innerHTML\":_s(raw)}})"
            );
        }

        #[test]
        fn should_wrap_object_bindings_and_listeners() {
            assert_eq!(render_body("<div v-bind=\"obj\"></div>"), "_c('div',_b({},'div',obj,false))");
            assert_eq!(
                render_body("<div v-bind.prop=\"obj\"></div>"),
                "_c('div',_b({},'div',obj,true))"
            );
            assert_eq!(render_body("<div v-on=\"listeners\"></div>"), "_c('div',_g({},listeners))");
        }

        #[test]
        fn should_bind_props_with_the_prop_modifier() {
            assert_eq!(
                render_body("<div :text-content.prop=\"t\"></div>"),
                "_c('div',{domProps:{\"textContent\":t}})"
            );
        }
    }

    mod structural {
        use super::*;

        #[test]
        fn should_generate_if_chains() {
            assert_eq!(
                render_body("<div><p v-if=\"a\">1</p><p v-else-if=\"b\">2</p><p v-else>3</p></div>"),
                "_c('div',[(a)?_c('p',[_v(\"1\")]):(b)?_c('p',[_v(\"2\")]):_c('p',[_v(\"3\")])])"
            );
        }

        #[test]
        fn should_generate_loops_with_iterators() {
            assert_eq!(
                render_body(
                    "<ul><li v-for=\"(item, index) in items\" :key=\"item.id\">{{ item.name }}</li></ul>"
                ),
                "_c('ul',_l((items),function(item,index){return _c('li',{key:item.id},[_v(_s(item.name))])}),0)"
            );
        }

        #[test]
        fn should_render_template_children_inline() {
            assert_eq!(
                render_body("<div><template v-if=\"ok\"><p>a</p><p>b</p></template></div>"),
                "_c('div',[(ok)?[_c('p',[_v(\"a\")]),_c('p',[_v(\"b\")])]:_e()],2)"
            );
        }

        #[test]
        fn should_hoist_v_once_outside_loops() {
            let (code, _) = compile_with("<div><p v-if=\"a\" v-once>{{x}}</p></div>", &base_options());
            assert_eq!(code.render, "with(this){return _c('div',[(a)?_m(0):_e()])}");
            assert_eq!(code.static_render_fns, vec!["with(this){return _c('p',[_v(_s(x))])}"]);
        }

        #[test]
        fn should_cache_v_once_inside_keyed_loops() {
            let (code, diagnostics) = compile_with(
                "<div><div v-for=\"i in l\" :key=\"i\"><span v-once>{{i}}</span></div></div>",
                &base_options(),
            );
            assert!(diagnostics.is_empty());
            assert_eq!(
                code.render,
                "with(this){return _c('div',_l((l),function(i){return _c('div',{key:i},[_o(_c('span',[_v(_s(i))]),0,i)])}),0)}"
            );
        }

        #[test]
        fn should_warn_about_v_once_in_unkeyed_loops() {
            let (code, diagnostics) = compile_with(
                "<div><div v-for=\"i in l\"><span v-once>{{i}}</span></div></div>",
                &base_options(),
            );
            assert_eq!(
                messages(&diagnostics),
                vec!["v-once can only be used inside v-for that is keyed. "]
            );
            assert!(code.render.contains("[_c('span',[_v(_s(i))])]"));
        }
    }

    mod static_trees {
        use super::*;

        #[test]
        fn should_flag_hoisted_trees_inside_loops() {
            let (code, _) = compile_with(
                "<ul><li v-for=\"i in l\"><p><b>a</b></p></li></ul>",
                &base_options(),
            );
            assert_eq!(
                code.render,
                "with(this){return _c('ul',_l((l),function(i){return _c('li',[_m(0,true)])}),0)}"
            );
            assert_eq!(
                code.static_render_fns,
                vec!["with(this){return _c('p',[_c('b',[_v(\"a\")])])}"]
            );
        }

        #[test]
        fn should_hoist_v_pre_trees_with_raw_text() {
            let (code, _) = compile_with("<div v-pre><b>{{a}}</b></div>", &base_options());
            assert_eq!(code.render, "with(this){return _m(0)}");
            assert_eq!(
                code.static_render_fns,
                vec!["with(this){return _c('div',{pre:true},[_c('b',[_v(\"{{a}}\")])])}"]
            );
        }
    }

    mod components {
        use super::*;

        #[test]
        fn should_generate_dynamic_components() {
            assert_eq!(
                render_body("<component :is=\"view\"></component>"),
                "_c(view,{tag:\"component\"})"
            );
            assert_eq!(
                render_body("<component :is=\"view\"><p>x</p></component>"),
                "_c(view,{tag:\"component\"},[_c('p',[_v(\"x\")])])"
            );
        }

        #[test]
        fn should_use_simple_normalization_for_component_lists() {
            let (code, diagnostics) =
                compile_with("<div><my-comp v-for=\"i in l\"></my-comp></div>", &base_options());
            assert_eq!(
                code.render,
                "with(this){return _c('div',_l((l),function(i){return _c('my-comp')}),1)}"
            );
            assert!(diagnostics.entries()[0].is_tip());
        }

        #[test]
        fn should_generate_inline_templates() {
            assert_eq!(
                render_body("<my-comp inline-template><div>{{a}}</div></my-comp>"),
                "_c('my-comp',{inlineTemplate:{render:function(){with(this){return _c('div',[_v(_s(a))])}},staticRenderFns:[]}})"
            );
        }

        #[test]
        fn should_keep_legacy_named_slots_as_children() {
            assert_eq!(
                render_body("<my-comp><p slot=\"a\">x</p></my-comp>"),
                "_c('my-comp',[_c('p',{attrs:{\"slot\":\"a\"},slot:\"a\"},[_v(\"x\")])])"
            );
        }
    }

    mod slots {
        use super::*;

        #[test]
        fn should_generate_scoped_slots() {
            assert_eq!(
                render_body(
                    "<my-comp><template v-slot:header=\"props\">{{props.a}}</template></my-comp>"
                ),
                "_c('my-comp',{scopedSlots:_u([{key:\"header\",fn:function(props){return [_v(_s(props.a))]}}])})"
            );
        }

        #[test]
        fn should_proxy_slots_without_scope() {
            assert_eq!(
                render_body("<my-comp v-slot>hi</my-comp>"),
                "_c('my-comp',{scopedSlots:_u([{key:\"default\",fn:function(){return [_v(\"hi\")]},proxy:true}])})"
            );
        }

        #[test]
        fn should_force_update_dynamic_slot_names() {
            assert_eq!(
                render_body("<my-comp><template v-slot:[n]>x</template></my-comp>"),
                "_c('my-comp',{scopedSlots:_u([{key:n,fn:function(){return [_v(\"x\")]},proxy:true}],null,true)})"
            );
        }

        #[test]
        fn should_inline_conditions_of_legacy_scoped_slots() {
            assert_eq!(
                render_body(
                    "<my-comp><template slot=\"a\" slot-scope=\"p\" v-if=\"ok\">{{ p }}</template></my-comp>"
                ),
                "_c('my-comp',{scopedSlots:_u([{key:\"a\",fn:function(p){return (ok)?[_v(_s(p))]:undefined}}],null,true)})"
            );
        }

        #[test]
        fn should_not_treat_an_empty_slot_scope_as_legacy() {
            assert_eq!(
                render_body(
                    "<my-comp><template slot=\"a\" scope=\"p\" slot-scope=\"\" v-if=\"ok\">{{ p }}</template></my-comp>"
                ),
                "_c('my-comp',{scopedSlots:_u([(ok)?{key:\"a\",fn:function(p){return [_v(_s(p))]}}:null],null,true)})"
            );
        }

        #[test]
        fn should_key_slots_of_conditional_owners() {
            assert_eq!(
                render_body("<div><my-comp v-if=\"ok\"><template #a>x</template></my-comp></div>"),
                "_c('div',[(ok)?_c('my-comp',{scopedSlots:_u([{key:\"a\",fn:function(){return [_v(\"x\")]},proxy:true}],null,false,4141484228)}):_e()],1)"
            );
        }

        #[test]
        fn should_generate_slot_outlets() {
            assert_eq!(
                render_body("<div><slot></slot></div>"),
                "_c('div',[_t(\"default\")],2)"
            );
            assert_eq!(
                render_body("<div><slot v-bind=\"obj\"></slot></div>"),
                "_c('div',[_t(\"default\",null,null,obj)],2)"
            );
        }
    }

    mod roots {
        use super::*;

        #[test]
        fn should_render_an_empty_div_without_root() {
            assert_eq!(render(""), "with(this){return _c(\"div\")}");
        }
    }
}
