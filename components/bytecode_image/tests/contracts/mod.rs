//! Contract tests for bytecode_image

mod test_contract_compliance;
