use sqlx::PgConnection;

/// A handle to a live database connection, either checked out of a pool or borrowed
/// from somewhere else
pub trait ConnectionHandle {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the external systems the application talks to. Driven adapters
/// receive this instead of a concrete pool so the domain never depends on how the
/// connection was obtained.
pub trait ExternalConnectivity: Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle + Send
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
