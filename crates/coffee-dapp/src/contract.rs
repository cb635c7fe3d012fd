use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::SolCall;

use crate::rpc::CallRequest;
use crate::BuyMeACoffee;
use crate::DappError;

/// The coffee contract bound to a validated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoffeeContract {
    address: Address,
}

impl CoffeeContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Payable `buyCoffee()` sending `value` wei from `from`.
    pub fn buy_coffee(&self, from: Address, value: U256) -> CallRequest {
        CallRequest {
            from,
            to: self.address,
            value: Some(value),
            data: Bytes::from(BuyMeACoffee::buyCoffeeCall {}.abi_encode()),
        }
    }

    /// Non-payable `withdraw()` sent by `from`.
    pub fn withdraw(&self, from: Address) -> CallRequest {
        CallRequest {
            from,
            to: self.address,
            value: None,
            data: Bytes::from(BuyMeACoffee::withdrawCall {}.abi_encode()),
        }
    }

    /// Calldata for the `getBalance()` view.
    pub fn get_balance_calldata(&self) -> Bytes {
        Bytes::from(BuyMeACoffee::getBalanceCall {}.abi_encode())
    }

    /// Decode the `uint256` returned by `getBalance()`.
    pub fn decode_balance(data: &[u8]) -> Result<U256, DappError> {
        BuyMeACoffee::getBalanceCall::abi_decode_returns(data)
            .map_err(|e| DappError::CallFailed(format!("getBalance returned bad data: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_arg_calls_are_bare_selectors() {
        let contract = CoffeeContract::new(Address::repeat_byte(0x42));
        let from = Address::repeat_byte(0x01);

        let pay = contract.buy_coffee(from, U256::from(7));
        assert_eq!(pay.data.to_vec(), BuyMeACoffee::buyCoffeeCall::SELECTOR.to_vec());
        assert_eq!(pay.value, Some(U256::from(7)));
        assert_eq!(pay.to, contract.address());

        let withdraw = contract.withdraw(from);
        assert_eq!(withdraw.data.to_vec(), BuyMeACoffee::withdrawCall::SELECTOR.to_vec());
        assert_eq!(withdraw.value, None);

        assert_eq!(
            contract.get_balance_calldata().to_vec(),
            BuyMeACoffee::getBalanceCall::SELECTOR.to_vec()
        );
    }

    #[test]
    fn test_decode_balance() {
        let mut word = [0u8; 32];
        word[31] = 0x2a;
        assert_eq!(CoffeeContract::decode_balance(&word).unwrap(), U256::from(42));
    }

    #[test]
    fn test_decode_balance_short_data_fails() {
        assert!(CoffeeContract::decode_balance(&[0u8; 4]).is_err());
    }
}
