//! HTML Tag Tables
//!
//! Tag classifications used by the scanner's HTML recovery rules and by the web platform.

use once_cell::sync::Lazy;
use std::collections::HashSet;

fn tag_set(list: &'static str) -> HashSet<&'static str> {
    list.split(',').collect()
}

static HTML_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    tag_set(
        "html,body,base,head,link,meta,style,title,\
         address,article,aside,footer,header,h1,h2,h3,h4,h5,h6,hgroup,nav,section,\
         div,dd,dl,dt,figcaption,figure,picture,hr,img,li,main,ol,p,pre,ul,\
         a,b,abbr,bdi,bdo,br,cite,code,data,dfn,em,i,kbd,mark,q,rp,rt,rtc,ruby,\
         s,samp,small,span,strong,sub,sup,time,u,var,wbr,area,audio,map,track,video,\
         embed,object,param,source,canvas,script,noscript,del,ins,\
         caption,col,colgroup,table,thead,tbody,td,th,tr,\
         button,datalist,fieldset,form,input,label,legend,meter,optgroup,option,\
         output,progress,select,textarea,\
         details,dialog,menu,menuitem,summary,\
         content,element,shadow,template,blockquote,iframe,tfoot",
    )
});

// Matched case-insensitively
static SVG_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    tag_set(
        "svg,animate,circle,clippath,cursor,defs,desc,ellipse,filter,font-face,\
         foreignobject,g,glyph,image,line,marker,mask,missing-glyph,path,pattern,\
         polygon,polyline,rect,switch,symbol,text,textpath,tspan,use,view",
    )
});

static VOID_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    tag_set(
        "area,base,br,col,embed,frame,hr,img,input,isindex,keygen,\
         link,meta,param,source,track,wbr",
    )
});

// Elements that you can, intentionally, leave open (and which close themselves)
static LEFT_OPEN_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    tag_set("colgroup,dd,dt,li,options,p,td,tfoot,th,thead,tr,source")
});

// HTML5 tags https://html.spec.whatwg.org/multipage/indices.html#elements-3
// Phrasing Content https://html.spec.whatwg.org/multipage/dom.html#phrasing-content
static NON_PHRASING_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    tag_set(
        "address,article,aside,base,blockquote,body,caption,col,colgroup,dd,\
         details,dialog,div,dl,dt,fieldset,figcaption,figure,footer,form,\
         h1,h2,h3,h4,h5,h6,head,header,hgroup,hr,html,legend,li,menuitem,meta,\
         optgroup,option,param,rp,rt,source,style,summary,tbody,td,tfoot,th,thead,\
         title,tr,track",
    )
});

// Raw text containers: content up to the matching end tag is one text run
static PLAIN_TEXT_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| tag_set("script,style,textarea"));

// Raw text containers whose content is kept exactly as written
static VERBATIM_TEXT_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| tag_set("script,style,noscript"));

static IGNORE_FIRST_LF_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| tag_set("pre,textarea"));

static BUILT_IN_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| tag_set("slot,component"));

pub fn is_html_tag(tag: &str) -> bool {
    HTML_TAGS.contains(tag)
}

pub fn is_svg(tag: &str) -> bool {
    SVG_TAGS.contains(tag.to_lowercase().as_str())
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(tag)
}

pub fn can_be_left_open_tag(tag: &str) -> bool {
    LEFT_OPEN_TAGS.contains(tag)
}

pub fn is_non_phrasing_tag(tag: &str) -> bool {
    NON_PHRASING_TAGS.contains(tag)
}

pub fn is_plain_text_element(tag: &str) -> bool {
    PLAIN_TEXT_TAGS.contains(tag.to_lowercase().as_str())
}

pub fn is_verbatim_text_element(tag: &str) -> bool {
    VERBATIM_TEXT_TAGS.contains(tag.to_lowercase().as_str())
}

pub fn should_ignore_first_lf(tag: &str) -> bool {
    IGNORE_FIRST_LF_TAGS.contains(tag.to_lowercase().as_str())
}

/// `slot` and `component` are compiler pseudo-tags, never rendered as-is
pub fn is_built_in_tag(tag: &str) -> bool {
    BUILT_IN_TAGS.contains(tag)
}
