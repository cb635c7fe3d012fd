use alloy::primitives::Address;

use crate::address::connected_status;
use crate::client::{ReadClient, WriteClient};
use crate::contract::CoffeeContract;

/// A connected wallet session. Built once by a successful connect and never
/// mutated afterwards.
#[derive(Debug)]
pub struct Session<W, R> {
    account: Address,
    /// The account exactly as the wallet returned it.
    account_text: String,
    writer: WriteClient<W>,
    reader: ReadClient<R>,
    contract: CoffeeContract,
}

impl<W, R> Session<W, R> {
    pub fn new(
        account: Address,
        account_text: String,
        writer: WriteClient<W>,
        reader: ReadClient<R>,
        contract: CoffeeContract,
    ) -> Self {
        Self {
            account,
            account_text,
            writer,
            reader,
            contract,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn account_text(&self) -> &str {
        &self.account_text
    }

    pub fn writer(&self) -> &WriteClient<W> {
        &self.writer
    }

    pub fn reader(&self) -> &ReadClient<R> {
        &self.reader
    }

    pub fn contract(&self) -> &CoffeeContract {
        &self.contract
    }

    /// "Connected: 0xabcd...1234", shortened from the wallet's own spelling
    /// of the account.
    pub fn status_line(&self) -> String {
        connected_status(&self.account_text)
    }
}
