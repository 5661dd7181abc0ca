//! Service bodies.

use super::entity::parse_rpc;
use super::scope::{scan, Cursor, Scope, Session};
use crate::error::Result;
use crate::lexer::Token;
use crate::model::Service;
use tracing::{debug, trace};

/// Parses a service body into its RPC signatures
pub(crate) fn parse_service(
    name: String,
    body: &str,
    comment: String,
    session: &mut Session,
) -> Result<Service> {
    debug!("parsing service '{}'", name);

    let mut scope = ServiceScope {
        service: Service {
            name,
            comment,
            rpcs: Vec::new(),
        },
    };
    scan(&mut scope, body, session)?;
    Ok(scope.service)
}

struct ServiceScope {
    service: Service,
}

impl Scope for ServiceScope {
    fn name(&self) -> &str {
        &self.service.name
    }

    fn accept(&mut self, token: Token, cx: &mut Cursor<'_, '_>) -> Result<()> {
        match token {
            Token::Rpc => {
                let comment = cx.take_comment();
                let statement = cx.rpc_statement(self.name())?;
                let parsed = parse_rpc(self.name(), &statement, comment);
                if let Some(rpc) = cx.recover(parsed)? {
                    self.service.rpcs.push(rpc);
                }
            }
            Token::Option => cx.discard_statement(&token),
            other => trace!("ignoring '{}' in service '{}'", other, self.name()),
        }
        Ok(())
    }
}
