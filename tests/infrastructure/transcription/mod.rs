mod assemblyai_client_test;
