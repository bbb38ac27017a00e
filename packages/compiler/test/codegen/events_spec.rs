/**
 * Event Handler Codegen Tests
 *
 * `v-on` / `@` listeners as they appear in generated data objects.
 */

#[path = "../util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{parse_template, render_body};

    mod handlers {
        use super::*;

        #[test]
        fn should_pass_method_paths_through() {
            assert_eq!(
                render_body("<button @click=\"go\">x</button>"),
                "_c('button',{on:{\"click\":go}},[_v(\"x\")])"
            );
            assert_eq!(
                render_body("<button @click=\"handlers['save']\"></button>"),
                "_c('button',{on:{\"click\":handlers['save']}})"
            );
        }

        #[test]
        fn should_wrap_inline_statements() {
            assert_eq!(
                render_body("<button @click=\"count++\"></button>"),
                "_c('button',{on:{\"click\":function($event){count++}}})"
            );
            assert_eq!(
                render_body("<button @click=\"go(1)\"></button>"),
                "_c('button',{on:{\"click\":function($event){return go(1)}}})"
            );
        }

        #[test]
        fn should_keep_function_expressions() {
            assert_eq!(
                render_body("<button @click=\"() => go()\"></button>"),
                "_c('button',{on:{\"click\":() => go()}})"
            );
        }

        #[test]
        fn should_group_handlers_for_the_same_event() {
            let (ast, _) = parse_template("<div @click=\"a\" v-on:click=\"b\"></div>");
            assert_eq!(ast.root_element().unwrap().events["click"].len(), 2);
            assert_eq!(
                render_body("<div @click=\"a\" v-on:click=\"b\"></div>"),
                "_c('div',{on:{\"click\":[a,b]}})"
            );
        }
    }

    mod modifiers {
        use super::*;

        #[test]
        fn should_emit_guards() {
            assert_eq!(
                render_body("<form @submit.prevent=\"save\"></form>"),
                "_c('form',{on:{\"submit\":function($event){$event.preventDefault();return save.apply(null, arguments)}}})"
            );
            assert_eq!(
                render_body("<div @click.self=\"go\"></div>"),
                "_c('div',{on:{\"click\":function($event){if($event.target !== $event.currentTarget)return null;return go.apply(null, arguments)}}})"
            );
        }

        #[test]
        fn should_filter_keys() {
            assert_eq!(
                render_body("<input @keyup.enter=\"submit\">"),
                "_c('input',{on:{\"keyup\":function($event){if(!$event.type.indexOf('key')&&_k($event.keyCode,\"enter\",13,$event.key,\"Enter\"))return null;return submit.apply(null, arguments)}}})"
            );
        }

        #[test]
        fn should_mark_capture_once_and_passive() {
            assert_eq!(
                render_body("<div @click.once=\"go\"></div>"),
                "_c('div',{on:{\"~click\":function($event){return go.apply(null, arguments)}}})"
            );
            assert_eq!(
                render_body("<div @scroll.capture.passive=\"go\"></div>"),
                "_c('div',{on:{\"&!scroll\":function($event){return go.apply(null, arguments)}}})"
            );
        }

        #[test]
        fn should_remap_right_and_middle_clicks() {
            assert_eq!(
                render_body("<div @click.right=\"menu\"></div>"),
                "_c('div',{on:{\"contextmenu\":function($event){return menu.apply(null, arguments)}}})"
            );
            assert_eq!(
                render_body("<div @click.middle=\"m\"></div>"),
                "_c('div',{on:{\"mouseup\":function($event){if('button' in $event && $event.button !== 1)return null;return m.apply(null, arguments)}}})"
            );
        }

        #[test]
        fn should_route_native_listeners() {
            assert_eq!(
                render_body("<my-comp @click.native=\"go\"></my-comp>"),
                "_c('my-comp',{nativeOn:{\"click\":function($event){return go.apply(null, arguments)}}})"
            );
        }
    }

    mod dynamic_names {
        use super::*;

        #[test]
        fn should_bind_dynamic_event_names() {
            assert_eq!(
                render_body("<div @[evt]=\"go\"></div>"),
                "_c('div',{on:_d({},[evt,go])})"
            );
        }

        #[test]
        fn should_mark_dynamic_names_at_runtime() {
            assert_eq!(
                render_body("<div @[evt].capture=\"go\"></div>"),
                "_c('div',{on:_d({},[_p(evt,\"!\"),function($event){return go.apply(null, arguments)}])})"
            );
        }
    }
}
