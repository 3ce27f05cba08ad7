//! Source text wrapped around the bundler's compiled module body
//!
//! `prefix + body + suffix` registers a service factory with the host
//! runtime. Inside the factory's `init`, every property of the host `window`
//! is hoisted into local scope and the module body is exported through a
//! UMD-style shim: CommonJS `module.exports` first, then an AMD `define`
//! under the module name, then a global named after the service identity.
//!
//! Runtimes depend on this text byte for byte; do not reformat it.

use super::identity::ServiceIdentity;
use serde::Serialize;

const REGISTER_HEAD: &str = "service.register(options.serviceName, {
  create: function(id, env, config) {
    return {
      ";

const FACTORY_HEAD: &str = ": function(weex) {
        return {
          init : function(define, defineName, window) {
            for (var key in window) {
              eval('var ' + key + ' = window.' + key + ';');
            }
            ;(function(fn) {
              if (\"object\" == typeof exports && \"undefined\" != typeof module) module.exports = fn();
              else if (\"function\" == typeof define) {
                define(\"";

const AMD_TAIL: &str = "\", [], function(require, exports, module) {
                    module.exports = fn();
                });
              } else {
                var o;
                o = \"undefined\" != typeof window ? window: \"undefined\" != typeof self ? self: \"undefined\" != typeof global ? global: this,
                o.";

const BODY_HEAD: &str = " = fn()
              }
            })(function(){
              return ";

const SUFFIX: &str = " });
          }
        }
      }
    }
  }
})";

/// Prefix/suffix pair injected around one package's compiled chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWrapper {
    pub prefix: String,
    pub suffix: String,
}

impl ServiceWrapper {
    pub fn generate(module_name: &str, identity: &ServiceIdentity) -> Self {
        let module_literal = escape_js_string(module_name);
        let mut prefix = String::with_capacity(
            REGISTER_HEAD.len()
                + FACTORY_HEAD.len()
                + AMD_TAIL.len()
                + BODY_HEAD.len()
                + 2 * identity.as_str().len()
                + module_literal.len(),
        );
        prefix.push_str(REGISTER_HEAD);
        prefix.push_str(identity.as_str());
        prefix.push_str(FACTORY_HEAD);
        prefix.push_str(&module_literal);
        prefix.push_str(AMD_TAIL);
        prefix.push_str(identity.as_str());
        prefix.push_str(BODY_HEAD);

        Self {
            prefix,
            suffix: SUFFIX.to_string(),
        }
    }

    pub fn wrap(&self, body: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(body);
        out.push_str(&self.suffix);
        out
    }
}

fn escape_js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}
